use colored::Colorize;

/// Kind of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Final confirmation of a single-tool operation.
    Success,
    /// A batch item that worked (`✓`).
    Done,
    /// A batch item that needs attention (`⚠`).
    Notice,
    /// A batch item that failed (`✗`).
    Failed,
    Warning,
    Error,
    Info,
}

/// Sink for everything the installer tells the user.
pub trait Reporter {
    fn report(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.report(Level::Success, message);
    }

    fn done(&self, message: &str) {
        self.report(Level::Done, message);
    }

    fn notice(&self, message: &str) {
        self.report(Level::Notice, message);
    }

    fn failed(&self, message: &str) {
        self.report(Level::Failed, message);
    }

    fn warning(&self, message: &str) {
        self.report(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }
}

/// Prints colored messages to the terminal. Errors go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Success => println!("{} {}", "[OK]".green().bold(), message),
            Level::Done => println!("{} {}", "✓".green(), message),
            Level::Notice => println!("{} {}", "⚠".yellow(), message),
            Level::Failed => println!("{} {}", "✗".red(), message),
            Level::Warning => println!("{} {}", "[WARNING]".yellow().bold(), message),
            Level::Error => eprintln!("{} {}", "[ERROR]".red().bold(), message),
            Level::Info => println!("{message}"),
        }
    }
}
