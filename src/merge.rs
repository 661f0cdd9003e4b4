use crate::models::{Film, FilmCandidate, Patch, User, UserCandidate};

/// Fills every field the update left out with the stored film's value.
/// Required fields sent as `null` are inherited too; a `null` description
/// clears it.
pub fn merge_film(candidate: FilmCandidate, stored: &Film) -> FilmCandidate {
    FilmCandidate {
        id: Patch::Value(stored.id),
        name: candidate.name.or_inherit_required(|| stored.name.clone()),
        description: candidate.description.or_inherit(|| stored.description.clone()),
        release_date: candidate.release_date.or_inherit_required(|| stored.release_date),
        duration: candidate.duration.or_inherit_required(|| stored.duration),
    }
}

/// Fills every field the update left out with the stored user's value.
///
/// An explicit `null` name is kept so the display name falls back to the
/// (possibly new) login.
pub fn merge_user(candidate: UserCandidate, stored: &User) -> UserCandidate {
    UserCandidate {
        id: Patch::Value(stored.id),
        email: candidate.email.or_inherit_required(|| stored.email.clone()),
        login: candidate.login.or_inherit_required(|| stored.login.clone()),
        name: candidate.name.or_inherit(|| Some(stored.name.clone())),
        birthday: candidate.birthday.or_inherit_required(|| stored.birthday),
    }
}
