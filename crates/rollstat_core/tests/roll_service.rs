use chrono::{Datelike, NaiveDate};
use rollstat_core::db::open_db_in_memory;
use rollstat_core::{
    FixedDateProvider, NewRoll, RepoError, RollListQuery, RollService, SqliteRollRepository,
    SystemDateProvider,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixed_dates() -> FixedDateProvider {
    FixedDateProvider::new(date(2024, 5, 17), date(2024, 9, 1))
}

#[test]
fn create_uses_explicit_date_when_given() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    let roll = service
        .create_roll(&NewRoll::new(10.5, 20.3).added_on(date(2024, 1, 1)))
        .unwrap();
    assert_eq!(roll.date_added, date(2024, 1, 1));
}

#[test]
fn create_falls_back_to_provider_date() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    let roll = service.create_roll(&NewRoll::new(10.5, 20.3)).unwrap();
    assert_eq!(roll.date_added, date(2024, 5, 17));
    assert_eq!(service.get_roll(roll.id).unwrap().unwrap(), roll);
}

#[test]
fn system_provider_defaults_into_reference_year() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), SystemDateProvider::new(2024));

    for _ in 0..20 {
        let roll = service.create_roll(&NewRoll::new(1.0, 1.0)).unwrap();
        assert_eq!(roll.date_added.year(), 2024);
    }
}

#[test]
fn remove_defaults_to_today() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    let roll = service
        .create_roll(&NewRoll::new(10.5, 20.3).added_on(date(2024, 1, 1)))
        .unwrap();
    let removed = service.remove_roll(roll.id, None).unwrap();
    assert_eq!(removed.date_removed, Some(date(2024, 9, 1)));
}

#[test]
fn remove_with_explicit_date() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    let roll = service
        .create_roll(&NewRoll::new(10.5, 20.3).added_on(date(2024, 1, 1)))
        .unwrap();
    let removed = service
        .remove_roll(roll.id, Some(date(2024, 6, 1)))
        .unwrap();
    assert_eq!(removed.date_removed, Some(date(2024, 6, 1)));
}

#[test]
fn remove_before_add_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    let roll = service
        .create_roll(&NewRoll::new(10.5, 20.3).added_on(date(2024, 1, 1)))
        .unwrap();
    let err = service
        .remove_roll(roll.id, Some(date(2023, 12, 31)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn remove_today_before_future_add_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    let roll = service
        .create_roll(&NewRoll::new(1.0, 1.0).added_on(date(2024, 12, 1)))
        .unwrap();
    let err = service.remove_roll(roll.id, None).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn list_and_clear_delegate_to_repository() {
    let conn = open_db_in_memory().unwrap();
    let service = RollService::new(SqliteRollRepository::new(&conn), fixed_dates());

    service.create_roll(&NewRoll::new(1.0, 1.0)).unwrap();
    service.create_roll(&NewRoll::new(2.0, 2.0)).unwrap();

    assert_eq!(service.list_rolls(&RollListQuery::default()).unwrap().len(), 2);
    assert_eq!(service.clear_rolls().unwrap(), 2);
    assert!(service.list_rolls(&RollListQuery::default()).unwrap().is_empty());
}
