//! Appointment Lifecycle
//!
//! Walks one appointment through the clinic's status table against the
//! in-memory clinic.
//!
//! Key concepts:
//! - Patients must be registered before they can be booked
//! - Clinic hours are checked on creation and on every reschedule
//! - Only RESCHEDULED moves the slot
//! - Terminal statuses accept nothing further
//!
//! Run with: cargo run --example appointment_lifecycle

use chrono::{TimeZone, Utc};
use clinic_appointments::builder::AppointmentBuilder;
use clinic_appointments::config::ScheduleConfig;
use clinic_appointments::core::{AppointmentStatus, Shift};
use clinic_appointments::effects::{
    change_status, create_appointment, history, legal_next, InMemoryClinic, StatusChangeRequest,
};
use stillwater::effect::Effect;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Appointment Lifecycle Example ===\n");

    let env = InMemoryClinic::new(ScheduleConfig::default())
        .with_clock(Utc.with_ymd_and_hms(2024, 5, 31, 8, 0, 0).unwrap());
    let patient = env.register_patient(Uuid::new_v4())?;

    // 2024-06-03 is a Monday
    let new = AppointmentBuilder::new()
        .patient(patient)
        .date("2024-06-03")
        .time("10:30")
        .treatment_type("Post-surgical knee")
        .notes("Second week after ACL repair")
        .build()?;
    let appointment = create_appointment(new).run(&env).await?;
    let id = appointment.id;
    println!(
        "Created {} on {} at {} ({})",
        appointment.status, appointment.date, appointment.time, appointment.shift
    );

    change_status(id, StatusChangeRequest::to(AppointmentStatus::Scheduled))
        .run(&env)
        .await?;

    // Saturday afternoon is outside clinic hours
    let refused = change_status(id, StatusChangeRequest::reschedule("2024-06-08", "15:00"))
        .run(&env)
        .await;
    if let Err(err) = refused {
        println!("Reschedule refused: {err}");
    }

    let moved = change_status(
        id,
        StatusChangeRequest::reschedule("2024-06-05", "17:45").with_shift(Shift::Afternoon),
    )
    .run(&env)
    .await?;
    println!(
        "Moved to {} at {} ({}), now {}",
        moved.date, moved.time, moved.shift, moved.status
    );

    let next = legal_next(id).run(&env).await?;
    println!("Legal next: {next:?}");

    for status in [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Attended,
    ] {
        let updated = change_status(id, StatusChangeRequest::to(status))
            .run(&env)
            .await?;
        println!("-> {} (version {})", updated.status, updated.version);
    }

    let reopen = change_status(id, StatusChangeRequest::to(AppointmentStatus::Scheduled))
        .run(&env)
        .await;
    if let Err(err) = reopen {
        println!("Closed appointment stays closed: {err}");
    }

    println!("\nHistory:");
    for step in history(id).run(&env).await?.transitions() {
        println!("  {} -> {} at {}", step.from, step.to, step.timestamp);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
