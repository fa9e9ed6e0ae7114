use clap::Subcommand;
use surprise_core::{Database, Guestbook};

#[derive(Subcommand)]
pub enum GuestbookAction {
    /// Leave a message
    Sign {
        /// Your name
        name: String,
        /// Your birthday wish
        message: String,
    },
    /// Show all messages, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: GuestbookAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let book = Guestbook::new(&db);

    match action {
        GuestbookAction::Sign { name, message } => {
            let (_, event) = book.sign(&name, &message)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        GuestbookAction::List { json } => {
            let entries = book.entries()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No messages yet.");
            } else {
                for entry in entries {
                    println!(
                        "[{}] {}: {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M"),
                        entry.name,
                        entry.message
                    );
                }
            }
        }
    }
    Ok(())
}
