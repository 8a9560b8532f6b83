use pricewatch_core::{Msg, ScrapeOption};

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Feed a message into the state machine.
    Dispatch(Msg),
    /// Re-render the dashboard unconditionally.
    Show,
    Help,
    Quit,
    /// Blank line; nothing to do.
    Empty,
    /// Unparseable input with an explanation for the user.
    Invalid(String),
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match head {
        "demo" => Command::Dispatch(Msg::DemoClicked),
        "start" => Command::Dispatch(Msg::ScrapeSubmitted),
        "retry" => Command::Dispatch(Msg::RetryConnectivity),
        "refresh" => Command::Dispatch(Msg::RefreshRequested),
        "clear" => Command::Dispatch(Msg::UrlsInputChanged(String::new())),
        "url" => {
            if rest.is_empty() {
                Command::Invalid("usage: url <address>".to_string())
            } else {
                Command::Dispatch(Msg::UrlAppended(rest.to_string()))
            }
        }
        "site" => {
            if rest.is_empty() {
                Command::Invalid("usage: site <name>".to_string())
            } else {
                Command::Dispatch(Msg::SiteToggled(rest.to_string()))
            }
        }
        "max" => match rest.parse::<u32>() {
            Ok(count) => Command::Dispatch(Msg::MaxProductsChanged(count)),
            Err(_) => Command::Invalid("usage: max <count>".to_string()),
        },
        "ai" => Command::Dispatch(Msg::OptionToggled(ScrapeOption::AiParsing)),
        "images" => Command::Dispatch(Msg::OptionToggled(ScrapeOption::Images)),
        "reviews" => Command::Dispatch(Msg::OptionToggled(ScrapeOption::Reviews)),
        "status" | "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command: {other} (try 'help')")),
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  demo                start the live demo job
  url <address>       add a URL to the scrape form
  clear               clear the URL list
  site <name>         toggle a target site (amazon, bestbuy, walmart)
  max <count>         set the per-site product bound
  ai | images | reviews
                      toggle optional extraction features
  start               submit the scrape form
  refresh             reload products and analytics
  retry               re-check API connectivity
  status              show the dashboard
  help                show this help
  quit                exit
";
