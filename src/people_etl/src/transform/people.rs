//! Person summary: primary email + chapter subscription + constituent dates.
//!
//! ## Selection
//! - Only emails flagged primary take part. A person with none is dropped; a
//!   person with several yields one row per primary email.
//! - Only subscription rows for the requested [`ChapterId`] take part.
//!
//! ## Joins
//! 1. primary emails LEFT JOIN chapter subscriptions on `email_id`. An email
//!    with no row for the chapter is treated as subscribed (`is_unsubscribed =
//!    false`). Several rows for the same email and chapter each produce a row.
//! 2. result INNER JOIN constituents on `person_id`.
//!
//! ## Dates
//! The two constituent timestamps are not reliable as "created" and "modified"
//! in the source (the modification stamp is often the earlier one), so each row
//! takes the earlier as `created_date` and the later as `updated_date`.
//!
//! Row order follows the order of the email extract, which keeps repeated runs
//! byte-identical.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::models::{
    ChapterId, EmailId, EmailRecord, PersonId, PersonRecord, PersonSummary, SubscriptionRecord,
};

/// Join-integrity findings. None of these stop the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Constituents with no primary email; absent from the output.
    pub persons_without_primary_email: usize,
    /// Constituents with more than one primary email; repeated in the output.
    pub persons_with_multiple_primary_emails: usize,
    /// Primary emails with no row for the target chapter; filled as subscribed.
    pub emails_without_subscription: usize,
    /// Primary emails whose constituent is not in the `cons` extract; dropped.
    pub emails_without_person: usize,
}

impl JoinReport {
    /// True when every constituent had exactly one primary email that joined cleanly.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Emit one `warn!` per non-zero finding.
    pub fn log(&self) {
        if self.persons_without_primary_email > 0 {
            warn!(
                count = self.persons_without_primary_email,
                "constituents without a primary email were dropped"
            );
        }
        if self.persons_with_multiple_primary_emails > 0 {
            warn!(
                count = self.persons_with_multiple_primary_emails,
                "constituents with several primary emails appear more than once"
            );
        }
        if self.emails_without_subscription > 0 {
            warn!(
                count = self.emails_without_subscription,
                "primary emails without a chapter row were treated as subscribed"
            );
        }
        if self.emails_without_person > 0 {
            warn!(
                count = self.emails_without_person,
                "primary emails referencing unknown constituents were dropped"
            );
        }
    }
}

/// Output of [`build_people`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleBuild {
    /// One row per (person, primary email, matching chapter row).
    pub people: Vec<PersonSummary>,
    /// What the joins filled in or dropped.
    pub report: JoinReport,
}

/// Earlier and later of two timestamps, in that order.
pub fn resolve_dates(a: NaiveDateTime, b: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Build the `people` table from the three extracts.
pub fn build_people(
    persons: &[PersonRecord],
    emails: &[EmailRecord],
    subscriptions: &[SubscriptionRecord],
    chapter: ChapterId,
) -> PeopleBuild {
    let mut report = JoinReport::default();

    // chapter filter, keyed for the left join
    let mut unsub_by_email: HashMap<EmailId, Vec<bool>> = HashMap::new();
    for sub in subscriptions.iter().filter(|s| s.chapter_id == chapter) {
        unsub_by_email
            .entry(sub.email_id)
            .or_default()
            .push(sub.is_unsubscribed);
    }

    let mut persons_by_id: IndexMap<PersonId, Vec<&PersonRecord>> = IndexMap::new();
    for p in persons {
        persons_by_id.entry(p.person_id).or_default().push(p);
    }

    let mut primaries_per_person: HashMap<PersonId, usize> = HashMap::new();
    let mut people = Vec::new();

    for email in emails.iter().filter(|e| e.is_primary) {
        *primaries_per_person.entry(email.person_id).or_default() += 1;

        let Some(owners) = persons_by_id.get(&email.person_id) else {
            report.emails_without_person += 1;
            continue;
        };

        let flags: &[bool] = match unsub_by_email.get(&email.email_id) {
            Some(v) => v,
            None => {
                report.emails_without_subscription += 1;
                &[false]
            }
        };

        for &is_unsubscribed in flags {
            for person in owners {
                let (created_date, updated_date) =
                    resolve_dates(person.created_at, person.modified_at);
                people.push(PersonSummary {
                    email_address: email.address.clone(),
                    source_code: person.source_code.clone(),
                    is_unsubscribed,
                    created_date,
                    updated_date,
                });
            }
        }
    }

    report.persons_without_primary_email = persons_by_id
        .keys()
        .filter(|id| !primaries_per_person.contains_key(*id))
        .count();
    report.persons_with_multiple_primary_emails = primaries_per_person
        .iter()
        .filter(|(id, n)| **n > 1 && persons_by_id.contains_key(*id))
        .count();

    debug!(
        persons = persons.len(),
        emails = emails.len(),
        subscriptions = subscriptions.len(),
        chapter = %chapter,
        rows = people.len(),
        "people table built"
    );

    PeopleBuild { people, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn person(id: u64, code: &str, created: NaiveDateTime, modified: NaiveDateTime) -> PersonRecord {
        PersonRecord {
            person_id: PersonId(id),
            source_code: code.into(),
            created_at: created,
            modified_at: modified,
        }
    }

    fn email(person: u64, id: u64, addr: &str, primary: bool) -> EmailRecord {
        EmailRecord {
            person_id: PersonId(person),
            email_id: EmailId(id),
            address: addr.into(),
            is_primary: primary,
        }
    }

    fn sub(email: u64, chapter: i64, unsub: bool) -> SubscriptionRecord {
        SubscriptionRecord {
            email_id: EmailId(email),
            chapter_id: ChapterId(chapter),
            is_unsubscribed: unsub,
        }
    }

    #[test]
    fn dates_are_min_and_max_per_row() {
        let persons = [person(1, "web", ts(2020, 3, 5), ts(2020, 1, 10))];
        let emails = [email(1, 10, "p1@example.org", true)];
        let out = build_people(&persons, &emails, &[], ChapterId(1));
        assert_eq!(out.people.len(), 1);
        assert_eq!(out.people[0].created_date, ts(2020, 1, 10));
        assert_eq!(out.people[0].updated_date, ts(2020, 3, 5));
    }

    #[test]
    fn missing_subscription_means_subscribed() {
        let persons = [person(2, "x", ts(2020, 1, 1), ts(2020, 1, 2))];
        let emails = [email(2, 20, "p2@example.org", true)];
        // a row for another chapter does not count
        let subs = [sub(20, 7, true)];
        let out = build_people(&persons, &emails, &subs, ChapterId(1));
        assert_eq!(out.people.len(), 1);
        assert!(!out.people[0].is_unsubscribed);
        assert_eq!(out.report.emails_without_subscription, 1);
    }

    #[test]
    fn unsubscribed_row_in_target_chapter_is_kept() {
        let persons = [person(3, "x", ts(2020, 1, 1), ts(2020, 1, 2))];
        let emails = [email(3, 30, "p3@example.org", true)];
        let subs = [sub(30, 1, true), sub(30, 2, false)];
        let out = build_people(&persons, &emails, &subs, ChapterId(1));
        assert_eq!(out.people.len(), 1);
        assert!(out.people[0].is_unsubscribed);
        assert!(out.report.is_clean());
    }

    #[test]
    fn chapter_is_a_parameter() {
        let persons = [person(3, "x", ts(2020, 1, 1), ts(2020, 1, 2))];
        let emails = [email(3, 30, "p3@example.org", true)];
        let subs = [sub(30, 1, true), sub(30, 2, false)];
        let out = build_people(&persons, &emails, &subs, ChapterId(2));
        assert!(!out.people[0].is_unsubscribed);
    }

    #[test]
    fn person_without_primary_email_is_dropped() {
        let persons = [
            person(4, "a", ts(2020, 1, 1), ts(2020, 1, 1)),
            person(5, "b", ts(2020, 1, 1), ts(2020, 1, 1)),
        ];
        let emails = [
            email(4, 40, "p4@example.org", true),
            email(5, 50, "p5-secondary@example.org", false),
        ];
        let out = build_people(&persons, &emails, &[], ChapterId(1));
        assert_eq!(out.people.len(), 1);
        assert_eq!(out.people[0].email_address, "p4@example.org");
        assert_eq!(out.report.persons_without_primary_email, 1);
    }

    #[test]
    fn two_primary_emails_give_two_rows() {
        let persons = [person(6, "dup", ts(2020, 1, 1), ts(2020, 1, 1))];
        let emails = [
            email(6, 60, "a@example.org", true),
            email(6, 61, "b@example.org", true),
        ];
        let out = build_people(&persons, &emails, &[], ChapterId(1));
        let addrs: Vec<&str> = out.people.iter().map(|p| p.email_address.as_str()).collect();
        assert_eq!(addrs, ["a@example.org", "b@example.org"]);
        assert!(out.people.iter().all(|p| p.source_code == "dup"));
        assert_eq!(out.report.persons_with_multiple_primary_emails, 1);
    }

    #[test]
    fn email_for_unknown_person_is_dropped() {
        let emails = [email(99, 990, "ghost@example.org", true)];
        let out = build_people(&[], &emails, &[], ChapterId(1));
        assert!(out.people.is_empty());
        assert_eq!(out.report.emails_without_person, 1);
        // dropped before the chapter lookup, so not also counted as filled
        assert_eq!(out.report.emails_without_subscription, 0);
    }

    #[test]
    fn duplicate_chapter_rows_multiply() {
        let persons = [person(7, "x", ts(2020, 1, 1), ts(2020, 1, 1))];
        let emails = [email(7, 70, "p7@example.org", true)];
        let subs = [sub(70, 1, false), sub(70, 1, true)];
        let out = build_people(&persons, &emails, &subs, ChapterId(1));
        let flags: Vec<bool> = out.people.iter().map(|p| p.is_unsubscribed).collect();
        assert_eq!(flags, [false, true]);
    }

    #[test]
    fn snapshot_people_rows() {
        let persons = [person(1, "web", ts(2020, 3, 5), ts(2020, 1, 10))];
        let emails = [email(1, 10, "p1@example.org", true)];
        let subs = [sub(10, 1, true)];
        let out = build_people(&persons, &emails, &subs, ChapterId(1));
        insta::assert_json_snapshot!(out.people, @r###"
        [
          {
            "email": "p1@example.org",
            "code": "web",
            "is_unsub": true,
            "created_dt": "2020-01-10 00:00:00",
            "updated_dt": "2020-03-05 00:00:00"
          }
        ]
        "###);
    }

    prop_compose! {
        fn arb_ts()(days in 0i64..20_000, secs in 0u32..86_400) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
                + chrono::Duration::days(days)
                + chrono::Duration::seconds(secs as i64)
        }
    }

    prop_compose! {
        fn arb_tables()(
            n_persons in 0u64..12,
            raw_emails in proptest::collection::vec((0u64..14, any::<bool>()), 0..24),
            raw_subs in proptest::collection::vec((0usize..24, 0i64..3, any::<bool>()), 0..24),
            stamps in proptest::collection::vec((arb_ts(), arb_ts()), 12),
        ) -> (Vec<PersonRecord>, Vec<EmailRecord>, Vec<SubscriptionRecord>) {
            let persons = (0..n_persons)
                .map(|i| person(i, "c", stamps[i as usize].0, stamps[i as usize].1))
                .collect();
            let emails: Vec<EmailRecord> = raw_emails
                .iter()
                .enumerate()
                .map(|(i, (pid, primary))| email(*pid, i as u64, &format!("e{i}@x"), *primary))
                .collect();
            let subs = raw_subs
                .iter()
                .map(|(eid, ch, unsub)| sub(*eid as u64, *ch, *unsub))
                .collect();
            (persons, emails, subs)
        }
    }

    proptest! {
        #[test]
        fn created_never_after_updated((persons, emails, subs) in arb_tables()) {
            let out = build_people(&persons, &emails, &subs, ChapterId(1));
            for row in &out.people {
                prop_assert!(row.created_date <= row.updated_date);
            }
        }

        #[test]
        fn unmatched_primary_email_is_subscribed((persons, emails, subs) in arb_tables()) {
            let out = build_people(&persons, &emails, &subs, ChapterId(1));
            for row in &out.people {
                let e = emails.iter().find(|e| e.address == row.email_address).unwrap();
                let has_row = subs.iter().any(|s| s.email_id == e.email_id && s.chapter_id == ChapterId(1));
                if !has_row {
                    prop_assert!(!row.is_unsubscribed);
                }
            }
        }

        #[test]
        fn only_people_with_primary_email_appear((persons, emails, subs) in arb_tables()) {
            let out = build_people(&persons, &emails, &subs, ChapterId(1));
            for row in &out.people {
                let e = emails.iter().find(|e| e.address == row.email_address).unwrap();
                prop_assert!(e.is_primary);
                prop_assert!(persons.iter().any(|p| p.person_id == e.person_id));
            }
            // with at most one chapter row per email, rows are bounded by primary emails
            let mut deduped = subs.clone();
            deduped.sort_by_key(|s| (s.email_id, s.chapter_id));
            deduped.dedup_by_key(|s| (s.email_id, s.chapter_id));
            let out = build_people(&persons, &emails, &deduped, ChapterId(1));
            let primaries = emails
                .iter()
                .filter(|e| e.is_primary && persons.iter().any(|p| p.person_id == e.person_id))
                .count();
            prop_assert_eq!(out.people.len(), primaries);
        }

        #[test]
        fn rebuilding_is_idempotent((persons, emails, subs) in arb_tables()) {
            let a = build_people(&persons, &emails, &subs, ChapterId(1));
            let b = build_people(&persons, &emails, &subs, ChapterId(1));
            prop_assert_eq!(a, b);
        }
    }
}
