use crate::infra::{
    InMemoryApplicationRepository, InMemoryJobRepository, InMemoryProfileRepository,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

use jobhub::error::AppError;
use jobhub::portal::applications::ApplicationStatus;
use jobhub::portal::jobs::{JobDraft, JobFilter, JobType};
use jobhub::portal::profiles::{Role, SignupRequest};
use jobhub::portal::PortalService;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Application deadline for the demo posting (YYYY-MM-DD). Defaults to 30 days out.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) deadline: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let deadline = args
        .deadline
        .unwrap_or_else(|| Local::now().date_naive() + Duration::days(30));

    let service = PortalService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryJobRepository::default()),
        Arc::new(InMemoryApplicationRepository::default()),
    );

    println!("Job portal demo");

    let hr = match service.signup(SignupRequest {
        full_name: "Priya Nair".to_string(),
        email: "priya@acme.example".to_string(),
        role: Role::Hr,
    }) {
        Ok(profile) => profile,
        Err(err) => {
            println!("  HR signup rejected: {err}");
            return Ok(());
        }
    };
    let student = match service.signup(SignupRequest {
        full_name: "Jonas Weber".to_string(),
        email: "jonas@uni.example".to_string(),
        role: Role::Student,
    }) {
        Ok(profile) => profile,
        Err(err) => {
            println!("  Student signup rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Signed up {} ({}) and {} ({})",
        hr.full_name,
        hr.role.label(),
        student.full_name,
        student.role.label()
    );

    let job = match service.post_job(
        &hr.id,
        JobDraft {
            title: "Graduate Backend Engineer".to_string(),
            company_name: "Acme Labs".to_string(),
            description: "Build and run services for the placement platform.".to_string(),
            qualifications: "B.Sc. or final-year student".to_string(),
            location: "Berlin, Germany".to_string(),
            job_type: JobType::FullTime,
            salary_min: Some(48_000),
            salary_max: Some(62_000),
            deadline,
        },
    ) {
        Ok(job) => job,
        Err(err) => {
            println!("  Posting rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Posted '{}' at {} (deadline {})",
        job.title, job.company_name, job.deadline
    );

    let filter = JobFilter {
        search: Some("backend".to_string()),
        job_type: Some(JobType::FullTime),
        location: Some("berlin".to_string()),
    };
    let browsed = service.list_open_jobs(&filter)?;
    println!(
        "- Student browse for 'backend' full-time roles in Berlin: {} match(es)",
        browsed.len()
    );

    let application = match service.apply(
        &student.id,
        &job.id,
        "Final-year student with a Rust focus.".to_string(),
    ) {
        Ok(application) => application,
        Err(err) => {
            println!("  Application rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Application {} submitted -> status {}",
        application.id.0, application.status
    );

    if let Err(err) = service.apply(&student.id, &job.id, String::new()) {
        println!("  Second submission refused: {err}");
    }

    let dashboard = service.hr_dashboard(&hr.id)?;
    println!(
        "- HR dashboard: {} active job(s), {} application(s), {} pending review",
        dashboard.active_jobs, dashboard.total_applications, dashboard.pending_review
    );

    let shortlisted = service.transition(&hr.id, &application.id, ApplicationStatus::Shortlisted)?;
    println!("- HR shortlists -> status {}", shortlisted.status);

    let tracker = service.student_applications(&student.id)?;
    match serde_json::to_string_pretty(&tracker.stats) {
        Ok(json) => println!("  Student tracker stats:\n{json}"),
        Err(err) => println!("  Student tracker stats unavailable: {err}"),
    }

    let accepted = service.transition(&hr.id, &application.id, ApplicationStatus::Accepted)?;
    println!("- HR accepts -> status {}", accepted.status);

    if let Err(err) = service.transition(&hr.id, &application.id, ApplicationStatus::Rejected) {
        println!("  Late reversal refused: {err}");
    }

    Ok(())
}
