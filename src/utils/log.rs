#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        use $crate::utils::log::log;

        let log_message = format!($($arg)*);
        log($module, log_message)
    }};
}

pub fn log(module: &str, message: String) {
    use colored::Colorize;
    use crossterm::{execute, terminal::{Clear, ClearType}};
    use std::io::{Write, stdout};

    let colored_prefix = match module.to_lowercase().as_str() {
        "deploy" => format!("[{module}]").bright_blue().bold(),
        "git" => format!("[{module}]").bright_green().bold(),
        "error" => format!("[{module}]").bright_red().bold(),
        _ => format!("[{module}]").bright_yellow().bold(),
    };

    let mut stdout = stdout().lock();

    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{colored_prefix} {message}").ok();
    stdout.flush().ok();
}
