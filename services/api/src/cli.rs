use crate::demo::{run_assess, run_demo, run_import, AssessArgs, DemoArgs, ImportArgs};
use crate::server;
use cardio_predict::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Cardio Predict",
    about = "Score cardiovascular risk from clinical records and serve the assessment API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single clinical record supplied as flags
    Assess(AssessArgs),
    /// Assess every patient in a CSV export and print history and dashboard
    Import(ImportArgs),
    /// Run sample patients through the full assessment workflow
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardio_predict::assessment::{ChestPainType, Gender, RestingEcg, StSlope};

    #[test]
    fn assess_flags_parse_wire_labels() {
        let cli = Cli::try_parse_from([
            "cardio-predict-api",
            "assess",
            "--age",
            "58",
            "--gender",
            "female",
            "--chest-pain-type",
            "non-anginal",
            "--resting-bp",
            "142",
            "--cholesterol",
            "251",
            "--max-heart-rate",
            "150",
            "--oldpeak",
            "1.4",
            "--st-slope",
            "flat",
            "--diabetes",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Assess(args)) => {
                assert_eq!(args.gender, Gender::Female);
                assert_eq!(args.chest_pain_type, ChestPainType::NonAnginal);
                assert_eq!(args.resting_ecg, RestingEcg::Normal);
                assert_eq!(args.st_slope, StSlope::Flat);
                assert!(args.diabetes);
                assert!(!args.smoking);
            }
            other => panic!("expected assess command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_labels_are_rejected_by_the_parser() {
        let result = Cli::try_parse_from([
            "cardio-predict-api",
            "assess",
            "--age",
            "58",
            "--gender",
            "other",
            "--chest-pain-type",
            "typical",
            "--resting-bp",
            "142",
            "--cholesterol",
            "251",
            "--max-heart-rate",
            "150",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["cardio-predict-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
