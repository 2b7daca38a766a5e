//! End-to-end appointment workflows against the in-memory clinic.

use chrono::{TimeZone, Utc};
use clinic_appointments::builder::AppointmentBuilder;
use clinic_appointments::config::ScheduleConfig;
use clinic_appointments::core::{AppointmentStatus, PackageStatus, Shift, TreatmentPackage};
use clinic_appointments::effects::{
    change_status, create_appointment, get_appointment, history, legal_next, list_appointments,
    AppointmentFilter, ClinicEnv, InMemoryClinic, PackageStore, ServiceError, StatusChangeRequest,
};
use clinic_appointments::enforcement::ViolationError;
use std::num::NonZeroU32;
use stillwater::effect::Effect;
use uuid::Uuid;

fn clinic() -> InMemoryClinic {
    InMemoryClinic::new(ScheduleConfig::default())
        .with_clock(Utc.with_ymd_and_hms(2024, 5, 31, 8, 0, 0).unwrap())
}

fn patient(env: &InMemoryClinic) -> Uuid {
    env.register_patient(Uuid::new_v4()).unwrap()
}

#[tokio::test]
async fn package_course_runs_to_completion() {
    let env = clinic();
    let patient = patient(&env);
    let package = env
        .insert_package(TreatmentPackage::new(
            patient,
            "ACL rehabilitation",
            NonZeroU32::new(2).unwrap(),
            env.now(),
        ))
        .unwrap();

    for date in ["2024-06-03", "2024-06-05"] {
        let new = AppointmentBuilder::new()
            .patient(patient)
            .date(date)
            .time("18:30")
            .shift(Shift::Afternoon)
            .treatment_type("ACL rehabilitation")
            .package(package.id)
            .build()
            .unwrap();
        let appointment = create_appointment(new).run(&env).await.unwrap();

        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Attended,
        ] {
            change_status(appointment.id, StatusChangeRequest::to(status))
                .run(&env)
                .await
                .unwrap();
        }
    }

    let package = env.get_package(package.id).unwrap();
    assert_eq!(package.completed_sessions, 2);
    assert_eq!(package.status, PackageStatus::Completed);

    // A completed package cannot back a new booking
    let extra = AppointmentBuilder::new()
        .patient(patient)
        .date("2024-06-07")
        .time("09:00")
        .treatment_type("ACL rehabilitation")
        .package(package.id)
        .build()
        .unwrap();
    let result = create_appointment(extra).run(&env).await;
    assert!(matches!(
        result,
        Err(ServiceError::PackageNotActive {
            status: PackageStatus::Completed,
            ..
        })
    ));
}

#[tokio::test]
async fn reschedule_then_reconfirm() {
    let env = clinic();
    let new = AppointmentBuilder::new()
        .patient(patient(&env))
        .date("2024-06-03")
        .time("09:00")
        .treatment_type("Sciatica")
        .build()
        .unwrap();
    let appointment = create_appointment(new).run(&env).await.unwrap();
    let id = appointment.id;

    change_status(id, StatusChangeRequest::to(AppointmentStatus::Scheduled))
        .run(&env)
        .await
        .unwrap();

    // Saturday before noon is open
    let moved = change_status(id, StatusChangeRequest::reschedule("2024-06-08", "11:15"))
        .run(&env)
        .await
        .unwrap();
    assert_eq!(moved.status, AppointmentStatus::Rescheduled);
    assert_eq!(moved.shift, Shift::Morning);

    let next = legal_next(id).run(&env).await.unwrap();
    assert_eq!(
        next,
        vec![AppointmentStatus::Scheduled, AppointmentStatus::Cancelled]
    );

    for status in [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::NoShow,
    ] {
        change_status(id, StatusChangeRequest::to(status))
            .run(&env)
            .await
            .unwrap();
    }

    let closed = get_appointment(id).run(&env).await.unwrap();
    assert!(closed.is_closed());
    assert_eq!(closed.date.to_string(), "2024-06-08");
    assert_eq!(closed.version, 6);

    let trail = history(id).run(&env).await.unwrap();
    assert_eq!(trail.transitions().len(), 5);
    assert_eq!(trail.current(), Some(&AppointmentStatus::NoShow));

    let reopen = change_status(id, StatusChangeRequest::to(AppointmentStatus::Scheduled))
        .run(&env)
        .await;
    match reopen {
        Err(ServiceError::Transition(err)) => assert!(err.alternatives().is_empty()),
        other => panic!("Expected InvalidTransition, got {other:?}"),
    }
}

#[tokio::test]
async fn sunday_is_refused_whatever_the_hour() {
    let env = clinic();
    let new = AppointmentBuilder::new()
        .patient(patient(&env))
        .date("2024-06-09")
        .time("21:00")
        .treatment_type("Sports massage")
        .build()
        .unwrap();

    let err = create_appointment(new).run(&env).await.unwrap_err();

    match &err {
        ServiceError::OutsideClinicHours { violations } => {
            assert_eq!(violations.len(), 1);
            assert!(matches!(violations[0], ViolationError::ClosedOnSunday { .. }));
        }
        other => panic!("Expected OutsideClinicHours, got {other:?}"),
    }
    assert!(err.to_string().contains("closed on Sundays"));
}

#[tokio::test]
async fn listing_filters_by_status_across_patients() {
    let env = clinic();
    let mut ids = Vec::new();
    for (date, time) in [("2024-06-03", "08:00"), ("2024-06-04", "08:00"), ("2024-06-05", "08:00")] {
        let new = AppointmentBuilder::new()
            .patient(patient(&env))
            .date(date)
            .time(time)
            .treatment_type("Back care")
            .build()
            .unwrap();
        ids.push(create_appointment(new).run(&env).await.unwrap().id);
    }
    change_status(ids[0], StatusChangeRequest::to(AppointmentStatus::Cancelled))
        .run(&env)
        .await
        .unwrap();

    let open = list_appointments(AppointmentFilter::default().with_status(AppointmentStatus::New))
        .run(&env)
        .await
        .unwrap();

    assert_eq!(open.total, 2);
    let dates: Vec<String> = open.items.iter().map(|a| a.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-06-05", "2024-06-04"]);
}

#[tokio::test]
async fn stale_write_surfaces_as_conflict() {
    use clinic_appointments::core::apply_transition;
    use clinic_appointments::effects::AppointmentStore;

    let env = clinic();
    let new = AppointmentBuilder::new()
        .patient(patient(&env))
        .date("2024-06-03")
        .time("12:00")
        .treatment_type("Gait training")
        .build()
        .unwrap();
    let appointment = create_appointment(new).run(&env).await.unwrap();

    // Another writer lands first
    let cancel = apply_transition(
        appointment.status,
        AppointmentStatus::Cancelled,
        None,
        Utc::now(),
    )
    .unwrap();
    env.update_appointment(appointment.id, appointment.version, &cancel)
        .unwrap();

    let schedule = apply_transition(
        appointment.status,
        AppointmentStatus::Scheduled,
        None,
        Utc::now(),
    )
    .unwrap();
    let err: ServiceError = env
        .update_appointment(appointment.id, appointment.version, &schedule)
        .unwrap_err()
        .into();

    assert!(err.is_conflict());
}
