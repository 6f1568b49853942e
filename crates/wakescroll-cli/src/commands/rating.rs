use clap::Subcommand;
use wakescroll_core::rating;

#[derive(Subcommand)]
pub enum RatingAction {
    /// The intake quiz question catalog
    Questions,
    /// Score a set of answers (one severity 0-3 per question)
    Score {
        #[arg(required = true)]
        answers: Vec<u8>,
    },
}

pub fn run(action: RatingAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RatingAction::Questions => {
            println!("{}", serde_json::to_string_pretty(rating::questions())?);
        }
        RatingAction::Score { answers } => {
            let current = rating::calculate_rating(&answers);
            let report = serde_json::json!({
                "rating": current,
                "potential": rating::calculate_potential_rating(&current),
                "poor_lifestyle_percentage": rating::poor_lifestyle_percentage(&answers),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
