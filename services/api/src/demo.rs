use crate::infra::{InMemoryAssessmentRepository, LoggingDecisionPublisher};
use clap::Args;
use doctoral_assessment::error::AppError;
use doctoral_assessment::grading::{score_ratings, try_normalize_grade, ScoreSheet, RUBRIC};
use doctoral_assessment::workflows::assessment::{
    AnswerPayload, ApplicantRef, AssessmentPayload, AssessmentRepository, AssessmentService,
    InMemorySession, IntakeValidator, RatingInput, ServiceError, SessionUser,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding either ten ratings (numbers or null) or a full assessment payload
    #[arg(long)]
    pub(crate) ratings: PathBuf,
    /// Pretty-print the resulting score sheet
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reviewer username used for the demo session
    #[arg(long)]
    pub(crate) reviewer: Option<String>,
    /// Stop after submission without scoring
    #[arg(long)]
    pub(crate) skip_scoring: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatingsFile {
    Ratings(Vec<Option<f64>>),
    Assessment(AssessmentPayload),
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let sheet = score_file(&args.ratings)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&sheet)?
    } else {
        serde_json::to_string(&sheet)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn score_file(path: &Path) -> Result<ScoreSheet, AppError> {
    let raw = fs::read_to_string(path)?;
    let ratings = match serde_json::from_str::<RatingsFile>(&raw)? {
        RatingsFile::Ratings(ratings) => {
            for (index, rating) in ratings.iter().enumerate() {
                try_normalize_grade(*rating, index).map_err(ServiceError::from)?;
            }
            ratings
        }
        RatingsFile::Assessment(payload) => IntakeValidator::default()
            .validate(payload)
            .map_err(ServiceError::from)?
            .ratings(),
    };

    let sheet = score_ratings(&ratings).map_err(ServiceError::from)?;
    Ok(sheet)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        reviewer,
        skip_scoring,
    } = args;
    let reviewer = reviewer.unwrap_or_else(|| "demo.reviewer".to_string());

    println!("Doctoral assessment demo");
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let publisher = Arc::new(LoggingDecisionPublisher::default());
    let session = Arc::new(InMemorySession::signed_in(
        "demo-token",
        SessionUser {
            username: reviewer.clone(),
            display_name: reviewer.clone(),
        },
    ));
    let service = AssessmentService::new(repository.clone(), publisher.clone(), session);

    let record = match service.submit(demo_payload()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    let view = record.status_view();
    println!(
        "- Received assessment {} for applicant {} -> {}",
        view.assessment_id.0, view.applicant_id, view.lifecycle
    );

    if skip_scoring {
        return Ok(());
    }

    let sheet = match service.score(&record.id) {
        Ok(sheet) => sheet,
        Err(err) => {
            println!("  Scoring unavailable: {}", err);
            return Ok(());
        }
    };

    println!("  Scored by {}", reviewer);
    println!("  Per-question grades:");
    for ((index, answer), grade) in record.answers.iter().enumerate().zip(&sheet.grades) {
        let scale = RUBRIC[index];
        let rating = answer
            .rating
            .map(|value| format!("{value}"))
            .unwrap_or_else(|| "unrated".to_string());
        println!(
            "    {:>2}. {} [{}]: {} -> grade {}",
            index + 1,
            answer.question,
            scale.label(),
            rating,
            grade
        );
    }
    println!("  Result: {}", sheet.composite.summary());

    match repository.fetch(&record.id) {
        Ok(Some(stored)) => {
            println!(
                "  Public status payload:\n{}",
                serde_json::to_string_pretty(&stored.status_view())?
            );
        }
        Ok(None) => println!("  Repository lookup returned no record"),
        Err(err) => println!("  Repository unavailable: {}", err),
    }

    for notice in publisher.events() {
        println!(
            "  Notice dispatched: template={} -> {}",
            notice.template, notice.assessment_id.0
        );
    }

    Ok(())
}

fn demo_payload() -> AssessmentPayload {
    let answers = [
        ("Relevance of the research topic", 5.0),
        ("Originality of the proposal", 4.0),
        ("State of the art review", 16.0),
        ("Research methodology", 8.0),
        ("Expected results", 13.0),
        ("Publication record", 11.0),
        ("Work plan feasibility", 9.0),
        ("Bibliography", 7.0),
        ("Presentation quality", 4.0),
        ("Supervisor endorsement", 10.0),
    ];

    AssessmentPayload {
        applicant: ApplicantRef {
            applicant_id: "cand-demo".to_string(),
            full_name: "Demo Applicant".to_string(),
        },
        answers: answers
            .iter()
            .map(|(question, rating)| AnswerPayload {
                question: question.to_string(),
                rating: Some(RatingInput::Number(*rating)),
                feedback: None,
            })
            .collect(),
    }
}
