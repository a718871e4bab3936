use crate::domain::error::ValidationError;

pub const DEFAULT_LIMIT: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Name,
    Email,
}

impl OrderBy {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            _ => Err(ValidationError::InvalidOrderBy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidSortBy),
        }
    }
}

/// Raw list parameters as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct UserQueryInput {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated list parameters handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub order_by: OrderBy,
    pub direction: SortDirection,
    pub offset: u64,
    pub limit: u64,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            search: None,
            order_by: OrderBy::default(),
            direction: SortDirection::default(),
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TryFrom<UserQueryInput> for UserQuery {
    type Error = ValidationError;

    fn try_from(input: UserQueryInput) -> Result<Self, Self::Error> {
        let order_by = match non_empty(input.order_by) {
            Some(value) => OrderBy::parse(&value)?,
            None => OrderBy::default(),
        };
        let direction = match non_empty(input.sort) {
            Some(value) => SortDirection::parse(&value)?,
            None => SortDirection::default(),
        };
        let offset = input.offset.map_or(0, |o| o.max(0) as u64);
        let limit = match input.limit {
            Some(l) if l > 0 => l as u64,
            _ => DEFAULT_LIMIT,
        };

        Ok(Self {
            search: non_empty(input.search),
            order_by,
            direction,
            offset,
            limit,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
