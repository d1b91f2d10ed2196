//! Grouping of flat enrollment records by user
//!
//! The backend returns enrollments as one flat list. Views need them per
//! user, so the list is bucketed by `userId` in a single pass and every
//! fetched user gets its bucket attached (or an empty one).

use crate::{Enrollment, User, UserEnrollment};
use std::collections::{HashMap, HashSet};

/// Enrollments bucketed by user id, input order preserved inside each bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentIndex {
    buckets: HashMap<String, Vec<UserEnrollment>>,
}

impl EnrollmentIndex {
    /// Scan `enrollments` once. Records without a user id are not indexed.
    pub fn build(enrollments: &[Enrollment]) -> Self {
        let mut buckets: HashMap<String, Vec<UserEnrollment>> = HashMap::new();

        for enrollment in enrollments {
            if let Some(user_id) = &enrollment.user_id {
                buckets
                    .entry(user_id.clone())
                    .or_default()
                    .push(UserEnrollment::from(enrollment));
            }
        }

        Self { buckets }
    }

    pub fn get(&self, user_id: &str) -> &[UserEnrollment] {
        self.buckets.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct user ids seen
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Users with enrollments attached, plus the records no user could claim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregated {
    pub users: Vec<User>,
    pub unmatched: Vec<Enrollment>,
}

/// Attach each user's enrollments.
///
/// The output holds exactly one entry per input user, in input order.
/// Existing `enrollments` on the input users are replaced. Duplicate
/// enrollments are kept. Records whose user id is missing or does not match
/// any user end up in `unmatched`, in input order.
pub fn attach_enrollments(users: &[User], enrollments: &[Enrollment]) -> Aggregated {
    let index = EnrollmentIndex::build(enrollments);

    let known: HashSet<&str> = users.iter().map(|u| u.uuid.as_str()).collect();
    let unmatched = enrollments
        .iter()
        .filter(|e| match e.user_id.as_deref() {
            Some(id) => !known.contains(id),
            None => true,
        })
        .cloned()
        .collect();

    let users = users
        .iter()
        .map(|user| User {
            enrollments: index.get(&user.uuid).to_vec(),
            ..user.clone()
        })
        .collect();

    Aggregated { users, unmatched }
}
