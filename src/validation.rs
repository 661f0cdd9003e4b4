use std::sync::LazyLock;

use jiff::civil::{Date, date};
use regex::Regex;
use serde::Serialize;

use crate::models::{FilmCandidate, Patch, UserCandidate};

/// Date of the first public film screening.
pub const MIN_RELEASE_DATE: Date = date(1895, 12, 28);

pub const MAX_DESCRIPTION_CHARS: usize = 200;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Create,
    Update,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    FilmNameBlank,
    FilmDescriptionTooLong,
    FilmReleaseDateMissing,
    FilmReleaseDateTooEarly,
    FilmDurationMissing,
    FilmDurationNotPositive,
    UserEmailBlank,
    UserEmailMalformed,
    UserLoginBlank,
    UserLoginWhitespace,
    UserBirthdayMissing,
    UserBirthdayInFuture,
}

impl Rule {
    pub fn message(self) -> &'static str {
        match self {
            Rule::FilmNameBlank => "film name must not be blank",
            Rule::FilmDescriptionTooLong => "film description must be at most 200 characters",
            Rule::FilmReleaseDateMissing => "film release date must be specified",
            Rule::FilmReleaseDateTooEarly => "film release date must not be before 1895-12-28",
            Rule::FilmDurationMissing => "film duration must be specified",
            Rule::FilmDurationNotPositive => "film duration must be positive",
            Rule::UserEmailBlank => "email must not be blank",
            Rule::UserEmailMalformed => "email must be a valid address",
            Rule::UserLoginBlank => "login must not be blank",
            Rule::UserLoginWhitespace => "login must not contain whitespace",
            Rule::UserBirthdayMissing => "birthday must be specified",
            Rule::UserBirthdayInFuture => "birthday must not be in the future",
        }
    }
}

/// The first field rule a candidate violated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{}", .rule.message())]
pub struct FieldError {
    pub rule: Rule,
}

impl FieldError {
    pub fn new(rule: Rule) -> Self {
        Self { rule }
    }
}

type Check<C, Ctx> = fn(&C, Mode, &Ctx) -> Result<(), Rule>;

const FILM_RULES: [Check<FilmCandidate, ()>; 4] =
    [film_name, film_description, film_release_date, film_duration];

const USER_RULES: [Check<UserCandidate, Date>; 3] = [user_email, user_login, user_birthday];

pub fn validate_film(candidate: &FilmCandidate, mode: Mode) -> Result<(), FieldError> {
    run(&FILM_RULES, candidate, mode, &())
}

/// `today` bounds the birthday; it moves with the request date.
pub fn validate_user(candidate: &UserCandidate, mode: Mode, today: Date) -> Result<(), FieldError> {
    run(&USER_RULES, candidate, mode, &today)
}

fn run<C, Ctx>(
    rules: &[Check<C, Ctx>],
    candidate: &C,
    mode: Mode,
    ctx: &Ctx,
) -> Result<(), FieldError> {
    rules.iter().try_for_each(|check| check(candidate, mode, ctx)).map_err(FieldError::new)
}

/// Resolves a required field for checking. `None` means the update left the
/// field out or sent `null`, and the stored value will be inherited.
fn required<T>(patch: &Patch<T>, mode: Mode, missing: Rule) -> Result<Option<&T>, Rule> {
    match (patch, mode) {
        (Patch::Value(v), _) => Ok(Some(v)),
        (Patch::Unset | Patch::Null, Mode::Update) => Ok(None),
        (Patch::Unset | Patch::Null, Mode::Create) => Err(missing),
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn film_name(c: &FilmCandidate, mode: Mode, _: &()) -> Result<(), Rule> {
    match required(&c.name, mode, Rule::FilmNameBlank)? {
        Some(name) if is_blank(name) => Err(Rule::FilmNameBlank),
        _ => Ok(()),
    }
}

fn film_description(c: &FilmCandidate, _: Mode, _: &()) -> Result<(), Rule> {
    match c.description.value() {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_CHARS => Err(Rule::FilmDescriptionTooLong),
        _ => Ok(()),
    }
}

fn film_release_date(c: &FilmCandidate, mode: Mode, _: &()) -> Result<(), Rule> {
    match required(&c.release_date, mode, Rule::FilmReleaseDateMissing)? {
        Some(&d) if d < MIN_RELEASE_DATE => Err(Rule::FilmReleaseDateTooEarly),
        _ => Ok(()),
    }
}

fn film_duration(c: &FilmCandidate, mode: Mode, _: &()) -> Result<(), Rule> {
    match required(&c.duration, mode, Rule::FilmDurationMissing)? {
        Some(&d) if d <= 0 => Err(Rule::FilmDurationNotPositive),
        _ => Ok(()),
    }
}

fn user_email(c: &UserCandidate, mode: Mode, _: &Date) -> Result<(), Rule> {
    match required(&c.email, mode, Rule::UserEmailBlank)? {
        Some(email) if is_blank(email) => Err(Rule::UserEmailBlank),
        Some(email) if !EMAIL.is_match(email) => Err(Rule::UserEmailMalformed),
        _ => Ok(()),
    }
}

fn user_login(c: &UserCandidate, mode: Mode, _: &Date) -> Result<(), Rule> {
    match required(&c.login, mode, Rule::UserLoginBlank)? {
        Some(login) if is_blank(login) => Err(Rule::UserLoginBlank),
        Some(login) if login.chars().any(char::is_whitespace) => Err(Rule::UserLoginWhitespace),
        _ => Ok(()),
    }
}

fn user_birthday(c: &UserCandidate, mode: Mode, today: &Date) -> Result<(), Rule> {
    match required(&c.birthday, mode, Rule::UserBirthdayMissing)? {
        Some(b) if b > today => Err(Rule::UserBirthdayInFuture),
        _ => Ok(()),
    }
}
