use clap::Subcommand;
use wakescroll_core::{Goals, Store};

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Add a goal
    Add {
        title: String,
        /// Daily target in minutes
        #[arg(default_value_t = 25)]
        target: u32,
    },
    /// All goals, newest first
    List,
    /// Delete a goal by id
    Delete { id: String },
}

pub fn run(action: GoalsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let goals = Goals::new(&store);

    match action {
        GoalsAction::Add { title, target } => {
            let goal = goals.save(&title, target)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalsAction::List => {
            println!("{}", serde_json::to_string_pretty(&goals.list()?)?);
        }
        GoalsAction::Delete { id } => {
            if goals.delete(&id)? {
                println!("deleted {id}");
            } else {
                eprintln!("no goal with id {id}");
            }
        }
    }
    Ok(())
}
