//! Output formatters for analysis and ranking reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScorerError};
use crate::output::report::{AnalysisReport, RankingReport, ScoreBand};
use crate::processing::fusion::AnalysisResult;
use crate::processing::ranker::RankedEntry;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering reports in one output format
pub trait OutputFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String>;
    fn format_ranking(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for machine consumption
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter rendered through an askama template
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 960px; margin: 0 auto; padding: 20px; color: #333; }
        table { border-collapse: collapse; width: 100%; }
        th, td { padding: 8px 10px; border-bottom: 1px solid #e9ecef; text-align: left; }
        .score-strong { color: #28a745; font-weight: bold; }
        .score-moderate { color: #17a2b8; font-weight: bold; }
        .score-weak { color: #d39e00; font-weight: bold; }
        .score-poor { color: #dc3545; font-weight: bold; }
        .keyword { display: inline-block; background: #f1f3f5; border-radius: 10px; padding: 2px 8px; margin: 2px; }
        .warning { color: #856404; }
        .metadata { color: #6c757d; font-size: 0.9em; }
    </style>
    {% endif %}
</head>
<body>
    <h1>{{ title }}</h1>
    <p class="metadata">Generated {{ generated_at }} &middot; job: {{ job_file }} &middot; models: {{ embedding_model }}, {{ tagger_model }}</p>
    {% for warning in warnings %}
    <p class="warning">Warning: {{ warning }}</p>
    {% endfor %}
    {% if rows.is_empty() %}
    <p><strong>No results:</strong> no resume could be scored.</p>
    {% else %}
    <table>
        <tr><th>#</th><th>Resume</th><th>Final</th><th>Keywords</th><th>Semantic</th><th>Matched</th><th>Missing keywords</th></tr>
        {% for row in rows %}
        <tr>
            <td>{{ row.rank }}</td>
            <td>{{ row.id }}</td>
            <td class="{{ row.band_class }}">{{ row.final_score }}%</td>
            <td>{{ row.keyword_score }}%</td>
            <td>{{ row.semantic_score }}%</td>
            <td>{{ row.matched }}</td>
            <td>{% for keyword in row.missing %}<span class="keyword">{{ keyword }}</span>{% endfor %}</td>
        </tr>
        {% endfor %}
    </table>
    {% endif %}
    {% if !failures.is_empty() %}
    <h2>Not ranked</h2>
    <ul>
        {% for failure in failures %}
        <li>{{ failure }}</li>
        {% endfor %}
    </ul>
    {% endif %}
</body>
</html>"#
)]
struct HtmlTemplate {
    title: String,
    include_styles: bool,
    generated_at: String,
    job_file: String,
    embedding_model: String,
    tagger_model: String,
    warnings: Vec<String>,
    rows: Vec<HtmlRow>,
    failures: Vec<String>,
}

struct HtmlRow {
    rank: usize,
    id: String,
    final_score: String,
    keyword_score: String,
    semantic_score: String,
    matched: String,
    missing: Vec<String>,
    band_class: &'static str,
}

impl HtmlRow {
    fn new(rank: usize, id: &str, result: &AnalysisResult) -> Self {
        Self {
            rank,
            id: id.to_string(),
            final_score: format!("{:.2}", result.final_score),
            keyword_score: format!("{:.2}", result.keyword_match_score),
            semantic_score: format!("{:.2}", result.semantic_similarity_score),
            matched: format!("{}/{}", result.matched_keywords, result.total_keywords_in_jd),
            missing: result.missing_keywords.clone(),
            band_class: ScoreBand::from_score(result.final_score).css_class(),
        }
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n# {}\n", title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let band = ScoreBand::from_score(score);
        let color = match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Moderate => Color::Yellow,
            ScoreBand::Weak => Color::BrightRed,
            ScoreBand::Poor => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_missing(&self, result: &AnalysisResult, limit: usize) -> String {
        if result.missing_keywords.is_empty() {
            return self.colorize("none, every job keyword is present", Color::Green);
        }

        let shown: Vec<&str> = result
            .missing_keywords
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect();
        let mut line = shown.join(", ");
        if result.missing_keywords.len() > limit {
            line.push_str(&format!(" (+{} more)", result.missing_keywords.len() - limit));
        }
        line
    }

    fn missing_limit(&self) -> usize {
        if self.detailed {
            usize::MAX
        } else {
            15
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.analysis.result;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS Match Analysis"));
        output.push_str(&format!(
            "Resume: {}  |  Job: {}\n",
            file_name(&report.resume_file),
            file_name(&report.metadata.job_file)
        ));

        for warning in &report.analysis.warnings {
            output.push_str(&self.colorize(&format!("Warning: {}\n", warning), Color::Yellow));
        }

        output.push_str(&format!(
            "\nATS Match Score: {:.2}% {}\n",
            result.final_score,
            self.format_score_badge(result.final_score)
        ));
        output.push_str(&format!("  Keyword Match:       {:.2}%\n", result.keyword_match_score));
        output.push_str(&format!("  Semantic Similarity: {:.2}%\n", result.semantic_similarity_score));
        output.push_str(&format!(
            "  Keywords matched:    {} of {}\n",
            result.matched_keywords, result.total_keywords_in_jd
        ));

        output.push_str(&self.format_header("Missing Keywords"));
        output.push_str(&self.format_missing(result, self.missing_limit()));
        output.push('\n');

        if self.detailed {
            output.push_str(&format!(
                "\nModels: {} (embeddings), {} (tagging)  |  Generated: {}\n",
                report.metadata.embedding_model,
                report.metadata.tagger_model,
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("Resume Ranking"));
        output.push_str(&format!("Job: {}\n", file_name(&report.metadata.job_file)));

        for warning in report.outcome.warnings() {
            output.push_str(&self.colorize(&format!("Warning: {}\n", warning), Color::Yellow));
        }

        let entries = report.visible_entries();
        if entries.is_empty() {
            output.push_str(&self.colorize("\nNo results: no resume could be scored.\n", Color::Red));
        } else {
            output.push_str(&format!(
                "\n{:>4}  {:<32} {:>8} {:>9} {:>9} {:>8}\n",
                "#", "Resume", "Final", "Keywords", "Semantic", "Matched"
            ));
            for entry in entries {
                let result = &entry.result;
                output.push_str(&format!(
                    "{:>4}  {:<32} {:>7.2}% {:>8.2}% {:>8.2}% {:>8}\n",
                    entry.rank,
                    entry.id,
                    result.final_score,
                    result.keyword_match_score,
                    result.semantic_similarity_score,
                    format!("{}/{}", result.matched_keywords, result.total_keywords_in_jd)
                ));
                if self.detailed {
                    output.push_str(&format!("      missing: {}\n", self.format_missing(result, usize::MAX)));
                }
            }

            let hidden = report.outcome.entries().len() - entries.len();
            if hidden > 0 {
                output.push_str(&format!("      ... and {} more\n", hidden));
            }
        }

        let failures = report.outcome.failures();
        if !failures.is_empty() {
            output.push_str(&self.format_header("Not Ranked"));
            for failure in failures {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.colorize("✗", Color::Red),
                    failure.id,
                    failure.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn metadata_line(&self, report_job: &str, generated: &chrono::DateTime<chrono::Utc>) -> String {
        if self.include_metadata {
            format!(
                "**Generated:** {} | **Job:** `{}`\n\n",
                generated.format("%Y-%m-%d %H:%M:%S UTC"),
                file_name(report_job)
            )
        } else {
            String::new()
        }
    }

    fn table_row(entry: &RankedEntry) -> String {
        let result = &entry.result;
        format!(
            "| {} | `{}` | {:.2}% | {:.2}% | {:.2}% | {}/{} |\n",
            entry.rank,
            entry.id,
            result.final_score,
            result.keyword_match_score,
            result.semantic_similarity_score,
            result.matched_keywords,
            result.total_keywords_in_jd
        )
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.analysis.result;
        let mut output = String::new();

        output.push_str("# ATS Match Analysis\n\n");
        output.push_str(&self.metadata_line(&report.metadata.job_file, &report.metadata.generated_at));
        output.push_str(&format!("**Resume:** `{}`\n\n", file_name(&report.resume_file)));

        for warning in &report.analysis.warnings {
            output.push_str(&format!("> **Warning:** {}\n\n", warning));
        }

        output.push_str(&format!(
            "**ATS Match Score:** {:.2}% ({})\n\n",
            result.final_score,
            report.band.label()
        ));
        output.push_str("| Component | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Keyword Match | {:.2}% |\n", result.keyword_match_score));
        output.push_str(&format!("| Semantic Similarity | {:.2}% |\n", result.semantic_similarity_score));
        output.push_str(&format!(
            "| Keywords Matched | {} of {} |\n\n",
            result.matched_keywords, result.total_keywords_in_jd
        ));

        output.push_str("## Missing Keywords\n\n");
        if result.missing_keywords.is_empty() {
            output.push_str("Every job keyword is present.\n");
        } else {
            for keyword in &result.missing_keywords {
                output.push_str(&format!("- `{}`\n", keyword));
            }
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Ranking\n\n");
        output.push_str(&self.metadata_line(&report.metadata.job_file, &report.metadata.generated_at));

        for warning in report.outcome.warnings() {
            output.push_str(&format!("> **Warning:** {}\n\n", warning));
        }

        let entries = report.visible_entries();
        if entries.is_empty() {
            output.push_str("**No results:** no resume could be scored.\n\n");
        } else {
            output.push_str("| # | Resume | Final | Keywords | Semantic | Matched |\n");
            output.push_str("|---|--------|-------|----------|----------|---------|\n");
            for entry in entries {
                output.push_str(&Self::table_row(entry));
            }
            output.push('\n');
        }

        let failures = report.outcome.failures();
        if !failures.is_empty() {
            output.push_str("## Not Ranked\n\n");
            for failure in failures {
                output.push_str(&format!("- `{}`: {}\n", failure.id, failure.reason));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn render(&self, template: HtmlTemplate) -> Result<String> {
        template.render().map_err(|e| {
            ResumeScorerError::OutputFormatting(format!("Failed to render HTML report: {}", e))
        })
    }

    fn base_template(&self, title: &str, report_metadata: &crate::output::report::ReportMetadata) -> HtmlTemplate {
        HtmlTemplate {
            title: title.to_string(),
            include_styles: self.include_styles,
            generated_at: report_metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            job_file: file_name(&report_metadata.job_file),
            embedding_model: report_metadata.embedding_model.clone(),
            tagger_model: report_metadata.tagger_model.clone(),
            warnings: Vec::new(),
            rows: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let mut template = self.base_template("ATS Match Analysis", &report.metadata);
        template.warnings = report.analysis.warnings.iter().map(|w| w.to_string()).collect();
        template.rows = vec![HtmlRow::new(1, &file_name(&report.resume_file), &report.analysis.result)];
        self.render(template)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut template = self.base_template("Resume Ranking", &report.metadata);
        template.warnings = report.outcome.warnings().iter().map(|w| w.to_string()).collect();
        template.rows = report
            .visible_entries()
            .iter()
            .map(|entry| HtmlRow::new(entry.rank, &entry.id, &entry.result))
            .collect();
        template.failures = report
            .outcome
            .failures()
            .iter()
            .map(|failure| format!("{}: {}", failure.id, failure.reason))
            .collect();
        self.render(template)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        }
    }

    pub fn generate_analysis(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_analysis(report)
    }

    pub fn generate_ranking(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_ranking(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, base_name: &str, timestamp: bool) -> String {
    let stem = Path::new(base_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!("{}_ats{}.{}", stem, timestamp_suffix, format.extension())
}
