//! Local list patching after an accepted mutation
//!
//! Every function here takes the previous list by reference and returns a
//! new one. Order is preserved and entries that do not match the key are
//! cloned unchanged.

use crate::{CourseRole, Rule, RulePayload, User};

/// Replace every item matching `matches` with `patch(item)`
pub fn patch_where<T, M, P>(items: &[T], matches: M, patch: P) -> Vec<T>
where
    T: Clone,
    M: Fn(&T) -> bool,
    P: Fn(&T) -> T,
{
    items
        .iter()
        .map(|item| if matches(item) { patch(item) } else { item.clone() })
        .collect()
}

/// Drop every item matching `matches`
pub fn remove_where<T, M>(items: &[T], matches: M) -> Vec<T>
where
    T: Clone,
    M: Fn(&T) -> bool,
{
    items.iter().filter(|item| !matches(item)).cloned().collect()
}

pub fn append<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

pub fn set_lock_status(users: &[User], uuid: &str, locked: bool) -> Vec<User> {
    if !users.iter().any(|u| u.uuid == uuid) {
        tracing::debug!(uuid, "lock status patch matched no local user");
    }

    patch_where(
        users,
        |u| u.uuid == uuid,
        |u| User {
            account_locked_by_admins: locked,
            ..u.clone()
        },
    )
}

/// Change the role of `uuid` in `course_id`; other enrollments are untouched
pub fn set_course_role(users: &[User], uuid: &str, course_id: &str, role: CourseRole) -> Vec<User> {
    patch_where(
        users,
        |u| u.uuid == uuid,
        |u| {
            let enrollments = patch_where(
                &u.enrollments,
                |e| e.course.id == course_id,
                |e| {
                    let mut e = e.clone();
                    e.role = role;
                    e
                },
            );
            User {
                enrollments,
                ..u.clone()
            }
        },
    )
}

pub fn merge_rule(rules: &[Rule], id: &str, payload: &RulePayload) -> Vec<Rule> {
    if !rules.iter().any(|r| r.id == id) {
        tracing::debug!(id, "rule patch matched no local rule");
    }

    patch_where(rules, |r| r.id == id, |r| r.merged(payload))
}
