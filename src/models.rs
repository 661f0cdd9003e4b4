use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    defaults,
    validation::{FieldError, Rule},
};

/// A field of a submitted record as it arrived on the wire.
///
/// `Unset` means the caller left the field out, `Null` means the caller sent
/// an explicit `null`. Updates treat the two differently: unset fields are
/// inherited from the stored record, null clears an optional field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Patch<T> {
    Unset,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Patch<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Unset | Patch::Null => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Unset | Patch::Null => None,
        }
    }

    /// Replaces an unset field with the prior value; null and values are kept.
    pub fn or_inherit(self, prior: impl FnOnce() -> Option<T>) -> Self {
        match self {
            Patch::Unset => Patch::from(prior()),
            other => other,
        }
    }

    /// Replaces an unset or null field with the prior value. Used for fields
    /// that cannot be cleared.
    pub fn or_inherit_required(self, prior: impl FnOnce() -> T) -> Self {
        match self {
            Patch::Unset | Patch::Null => Patch::Value(prior()),
            value => value,
        }
    }

    fn required(self, rule: Rule) -> Result<T, FieldError> {
        self.into_option().ok_or(FieldError::new(rule))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub release_date: Date,
    pub duration: i64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Date,
}

/// Film payload of a create or update request.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilmCandidate {
    pub id: Patch<i64>,
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub release_date: Patch<Date>,
    pub duration: Patch<i64>,
}

impl FilmCandidate {
    /// Builds the stored film. Call only after create-mode validation passed;
    /// a missing required field is still reported rather than assumed.
    pub fn into_film(self, id: i64) -> Result<Film, FieldError> {
        Ok(Film {
            id,
            name: self.name.required(Rule::FilmNameBlank)?,
            description: self.description.into_option(),
            release_date: self.release_date.required(Rule::FilmReleaseDateMissing)?,
            duration: self.duration.required(Rule::FilmDurationMissing)?,
        })
    }
}

/// User payload of a create or update request.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserCandidate {
    pub id: Patch<i64>,
    pub email: Patch<String>,
    pub login: Patch<String>,
    pub name: Patch<String>,
    pub birthday: Patch<Date>,
}

impl UserCandidate {
    /// Builds the stored user, resolving the display name default.
    pub fn into_user(self, id: i64) -> Result<User, FieldError> {
        let login = self.login.required(Rule::UserLoginBlank)?;
        Ok(User {
            id,
            email: self.email.required(Rule::UserEmailBlank)?,
            name: defaults::display_name(self.name.into_option(), &login),
            login,
            birthday: self.birthday.required(Rule::UserBirthdayMissing)?,
        })
    }
}
