use crate::core::formatter::render_plain;
use crate::core::message::Message;
use crate::ui::transcript::USER_PREFIX;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Appends conversation messages to a plain-text transcript file.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
}

impl TranscriptLog {
    pub fn disabled() -> Self {
        TranscriptLog { file_path: None }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        // Fail at startup rather than on the first message
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(TranscriptLog {
            file_path: Some(path),
        })
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn status_string(&self) -> String {
        match &self.file_path {
            None => "disabled".to_string(),
            Some(path) => format!(
                "active ({})",
                path.file_name().unwrap_or_default().to_string_lossy()
            ),
        }
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        write_entry(&mut writer, message)?;
        writer.flush()?;
        Ok(())
    }
}

fn write_entry<W: Write>(writer: &mut W, message: &Message) -> std::io::Result<()> {
    let body = if message.is_user() {
        format!("{USER_PREFIX}{}", message.raw_content())
    } else if message.is_error() {
        format!("## {}", message.raw_content())
    } else {
        message
            .rendered_content()
            .map(render_plain)
            .unwrap_or_else(|| message.raw_content().to_string())
    };

    for line in body.lines() {
        writeln!(writer, "{line}")?;
    }
    // Blank separator, matching the on-screen transcript
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::message::MessageId;
    use std::fs;
    use tempfile::tempdir;

    fn sample_history() -> Vec<Message> {
        vec![
            Message::user(MessageId::new(1), "How is **my** portfolio?"),
            Message::assistant(
                MessageId::new(2),
                "**Summary:** steady\n* Bonds up\n2. Rebalance",
                Vec::new(),
            ),
            Message::user(MessageId::new(3), "And now?"),
            Message::error(
                MessageId::new(4),
                ErrorKind::NetworkError.user_message(),
                ErrorKind::NetworkError.suggestions(),
            ),
        ]
    }

    #[test]
    fn appends_messages_with_prefixes() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let log = TranscriptLog::open(&path).expect("open log");
        assert!(log.is_active());
        assert_eq!(log.status_string(), "active (chat.log)");

        for message in sample_history() {
            log.log_message(&message).expect("log message");
        }

        let contents = fs::read_to_string(&path).expect("read log");
        let expected = format!(
            "You: How is **my** portfolio?\n\nSummary: steady\n- Bonds up\n2. Rebalance\n\nYou: And now?\n\n## {}\n\n",
            ErrorKind::NetworkError.user_message()
        );
        assert_eq!(contents, expected);
    }

    #[test]
    fn disabled_log_is_a_no_op() {
        let log = TranscriptLog::disabled();
        assert!(!log.is_active());
        assert_eq!(log.status_string(), "disabled");
        log.log_message(&sample_history()[0]).expect("no-op");
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("chat.log");
        assert!(TranscriptLog::open(path).is_err());
    }
}
