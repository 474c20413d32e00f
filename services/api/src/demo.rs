use std::fmt::Display;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;

use crate::infra::{BcryptHasher, InMemoryDirectoryRepository, LoggingNotifier, MemorySessionBroker};
use intern_hub::error::AppError;
use intern_hub::workflows::directory::domain::{
    AccountId, DirectoryQuery, PageRequest, StatusFilter,
};
use intern_hub::workflows::directory::intake::{
    CourseEntry, LanguageEntry, ProfileSubmission, SkillEntry,
};
use intern_hub::workflows::directory::service::{DirectoryService, DirectoryServiceError};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Register the sample roster but leave every profile unreviewed.
    #[arg(long)]
    pub(crate) skip_review: bool,
}

struct SampleStudent {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    city: &'static str,
    diploma: &'static str,
    skill: &'static str,
}

const ROSTER: [SampleStudent; 3] = [
    SampleStudent {
        first_name: "Lina",
        last_name: "Moreau",
        email: "lina.moreau@school.example",
        city: "Paris",
        diploma: "Master Software Engineering",
        skill: "Rust",
    },
    SampleStudent {
        first_name: "Youssef",
        last_name: "Benali",
        email: "youssef.benali@school.example",
        city: "Lyon",
        diploma: "Master Data Engineering",
        skill: "Python",
    },
    SampleStudent {
        first_name: "Emma",
        last_name: "Keller",
        email: "emma.keller@school.example",
        city: "Paris",
        diploma: "Bachelor Web Development",
        skill: "TypeScript",
    },
];

fn demo_error(err: impl Display) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("demo failed: {err}"),
    ))
}

fn submission_for(student: &SampleStudent) -> ProfileSubmission {
    ProfileSubmission {
        first_name: student.first_name.to_string(),
        last_name: student.last_name.to_string(),
        student_number: format!("S-{}", student.last_name.to_uppercase()),
        establishment: "ESGI Paris".to_string(),
        diploma: student.diploma.to_string(),
        phone: "+33612345678".to_string(),
        city: student.city.to_string(),
        linkedin: String::new(),
        presentation: format!(
            "{} student at ESGI looking for a six month internship in {}.",
            student.diploma, student.city
        ),
        expected_graduation: "2026".to_string(),
        class_projects: "Campus marketplace".to_string(),
        is_available_for_work: Some(true),
        courses: vec![CourseEntry {
            name: "Distributed Systems".to_string(),
            note: "17/20".to_string(),
        }],
        skills: vec![SkillEntry {
            name: student.skill.to_string(),
            level: "advanced".to_string(),
            certificate_url: String::new(),
        }],
        languages: vec![LanguageEntry {
            name: "French".to_string(),
            level: "native".to_string(),
        }],
        experiences: Vec::new(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryDirectoryRepository::default());
    let service = DirectoryService::new(
        repository,
        Arc::new(LoggingNotifier::new("http://localhost:3000".to_string())),
        Arc::new(MemorySessionBroker::default()),
        Arc::new(BcryptHasher),
    );

    println!("Internship directory demo");

    let admin = service
        .seed_admin("admin@school.example", "AdminPass!")
        .map_err(demo_error)?;
    println!("  seeded administrator {}", admin.email);

    let mut ids: Vec<AccountId> = Vec::new();
    for student in &ROSTER {
        let outcome = service
            .signup(intern_hub::workflows::directory::service::SignupRequest {
                first_name: student.first_name.to_string(),
                last_name: student.last_name.to_string(),
                email: student.email.to_string(),
                password: "ChangeMe123".to_string(),
            })
            .map_err(demo_error)?;
        println!(
            "  {} signed up ({})",
            student.email,
            outcome.status.label()
        );

        match service.login(student.email, "ChangeMe123") {
            Err(DirectoryServiceError::PendingApproval) => {
                println!("    login blocked: pending approval");
            }
            Ok(_) => println!("    login unexpectedly allowed"),
            Err(other) => return Err(demo_error(other)),
        }

        let id = AccountId(outcome.account.id);
        service
            .save_profile(&id, submission_for(student))
            .map_err(demo_error)?;
        service.login(student.email, "ChangeMe123").map_err(demo_error)?;
        println!("    profile completed; login now allowed");
        ids.push(id);
    }

    if !args.skip_review {
        for (student, id) in ROSTER.iter().zip(&ids).take(2) {
            service.approve_profile(id).map_err(demo_error)?;
            println!("  admin approved profile of {}", student.email);
        }
        if let (Some(student), Some(id)) = (ROSTER.last(), ids.last()) {
            service.reject_profile(id).map_err(demo_error)?;
            println!("  admin rejected profile of {}", student.email);
        }
    }

    let students = service
        .list_students(StatusFilter::All, PageRequest::default())
        .map_err(demo_error)?;
    println!("  review queue holds {} students", students.pagination.total);

    let stats = service.stats(Utc::now()).map_err(demo_error)?;
    println!(
        "  stats: {} complete, {} approved, {} pending",
        stats.totals.total_students, stats.totals.approved_profiles, stats.totals.pending_profiles
    );

    let paris = service
        .search_directory(
            &DirectoryQuery::from_params(None, Some("Paris"), None),
            PageRequest::default(),
        )
        .map_err(demo_error)?;
    println!("  directory search for Paris:");
    if paris.items.is_empty() {
        println!("    no students visible yet");
    }
    for entry in &paris.items {
        println!(
            "    {} {} — {} ({})",
            entry.first_name.as_deref().unwrap_or_default(),
            entry.last_name.as_deref().unwrap_or_default(),
            entry.diploma.as_deref().unwrap_or_default(),
            entry.email
        );
    }

    Ok(())
}
