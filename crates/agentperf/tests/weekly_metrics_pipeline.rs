use agentperf::sqlite::{ensure_schema, load_weekly_metrics};
use rusqlite::{Connection, params};
use time::{Date, Duration, Month};

fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("test date should be valid")
}

fn seeded_store() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
    ensure_schema(&connection).expect("schema creation should succeed");

    // Week of Mon 01 Jan 2024: Avery sees p1 twice and p2 once; Blake sees
    // p4 and p5. Week of Mon 08 Jan 2024: Avery sees p3.
    let viewings: &[(Option<&str>, &str, &str)] = &[
        (Some("p1"), "Avery", "01/01/2024"),
        (Some("p1"), "Avery", "03/01/2024"),
        (Some("p2"), "Avery", "04/01/2024"),
        (Some("p3"), "Avery", "08/01/2024"),
        (Some("p4"), "Blake", "05/01/2024"),
        (Some("p5"), "Blake", "02/01/2024"),
        (None, "Blake", "02/01/2024"),
    ];
    for (person_id, agent, viewing_date) in viewings {
        connection
            .execute(
                "INSERT INTO viewings (personId, Agent, Date) VALUES (?1, ?2, ?3)",
                params![person_id, agent, viewing_date],
            )
            .expect("viewing insert should succeed");
    }

    // p1 applied and signed; p2 never applied; p4 applied but did not sign;
    // p5 has no prospect row at all.
    let prospects: &[(&str, Option<&str>, &str)] = &[
        ("p1", Some("2024-01-05"), "Current"),
        ("p2", None, "Viewed"),
        ("p4", Some("2024-01-06"), "Applied"),
    ];
    for (person_id, applied, status) in prospects {
        connection
            .execute(
                "INSERT INTO prospects (personId, Applied, Status) VALUES (?1, ?2, ?3)",
                params![person_id, applied, status],
            )
            .expect("prospect insert should succeed");
    }

    connection
}

#[test]
fn counts_distinct_persons_per_agent_week() {
    let connection = seeded_store();
    let metrics = load_weekly_metrics(&connection).expect("load should succeed");

    let avery_week_one = metrics
        .iter()
        .find(|metric| metric.agent == "Avery" && metric.week_start == date(2024, Month::January, 1))
        .expect("Avery week one should exist");

    // p1 viewed twice in the week but counts once.
    assert_eq!(avery_week_one.total_viewings, 2);
    assert_eq!(avery_week_one.applications, 1);
    assert_eq!(avery_week_one.tenants, 1);
    assert_eq!(avery_week_one.view_to_app_rate, Some(50.0));
    assert_eq!(avery_week_one.app_to_tenant_rate, Some(100.0));
    assert_eq!(avery_week_one.total_conversion_rate, Some(50.0));
}

#[test]
fn viewing_without_prospect_row_counts_toward_viewings_only() {
    let connection = seeded_store();
    let metrics = load_weekly_metrics(&connection).expect("load should succeed");

    let blake = metrics
        .iter()
        .find(|metric| metric.agent == "Blake")
        .expect("Blake should exist");

    // p5 has no prospect row; p4 applied but never signed.
    assert_eq!(blake.total_viewings, 2);
    assert_eq!(blake.applications, 1);
    assert_eq!(blake.tenants, 0);
}

#[test]
fn viewings_missing_a_person_identifier_are_excluded() {
    let connection = seeded_store();
    let metrics = load_weekly_metrics(&connection).expect("load should succeed");

    let total: u64 = metrics.iter().map(|metric| metric.total_viewings).sum();
    // Five distinct identified persons; the NULL-person viewing vanishes.
    assert_eq!(total, 5);
}

#[test]
fn rows_are_ordered_by_week_start_then_agent() {
    let connection = seeded_store();
    let metrics = load_weekly_metrics(&connection).expect("load should succeed");

    let keys: Vec<(Date, &str)> = metrics
        .iter()
        .map(|metric| (metric.week_start, metric.agent.as_str()))
        .collect();
    assert_eq!(
        keys,
        [
            (date(2024, Month::January, 1), "Avery"),
            (date(2024, Month::January, 1), "Blake"),
            (date(2024, Month::January, 8), "Avery"),
        ]
    );
}

#[test]
fn every_row_spans_exactly_one_week() {
    let connection = seeded_store();
    let metrics = load_weekly_metrics(&connection).expect("load should succeed");

    assert!(!metrics.is_empty());
    for metric in &metrics {
        assert_eq!(metric.week_end, metric.week_start + Duration::days(6));
        assert_eq!(
            metric.week_start.weekday(),
            time::Weekday::Monday,
            "week buckets must start on Monday"
        );
    }
}

#[test]
fn rates_are_null_exactly_when_the_denominator_is_zero() {
    let connection = seeded_store();
    let metrics = load_weekly_metrics(&connection).expect("load should succeed");

    for metric in &metrics {
        assert_eq!(
            metric.view_to_app_rate.is_none(),
            metric.total_viewings == 0
        );
        assert_eq!(
            metric.app_to_tenant_rate.is_none(),
            metric.applications == 0
        );
        assert_eq!(
            metric.total_conversion_rate.is_none(),
            metric.total_viewings == 0
        );
        for rate in [
            metric.view_to_app_rate,
            metric.app_to_tenant_rate,
            metric.total_conversion_rate,
        ]
        .into_iter()
        .flatten()
        {
            assert!((0.0..=100.0).contains(&rate), "rate out of range: {rate}");
        }
    }

    // Avery's second week has a viewing but no applications, so the
    // app-to-tenant rate is undefined rather than zero or infinite.
    let avery_week_two = metrics
        .iter()
        .find(|metric| metric.week_start == date(2024, Month::January, 8))
        .expect("Avery week two should exist");
    assert_eq!(avery_week_two.view_to_app_rate, Some(0.0));
    assert_eq!(avery_week_two.app_to_tenant_rate, None);
}
