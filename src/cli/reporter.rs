use colored::Colorize;

use pathviz_annotator::TruncatedLoop;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// `error: <message>` followed by one `caused by:` line per source.
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut output = format!("{}: {error}", self.paint_error("error"));
        for cause in error.chain().skip(1) {
            output.push('\n');
            output.push_str(&format!("  {}: {cause}", self.paint_dim("caused by")));
        }
        output
    }

    pub fn format_truncation(&self, truncated: &TruncatedLoop) -> String {
        let mut output = format!(
            "{}: loop `{}` truncated after {} iterations",
            self.paint_warning("warning"),
            truncated.condition,
            truncated.iterations
        );
        if truncated.truncations > 1 {
            output.push_str(&format!(" ({} times)", truncated.truncations));
        }
        output
    }

    fn paint_error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
