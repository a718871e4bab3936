use crate::domain::models::user::UserId;

/// Path of a stored photo relative to the photo storage root, always `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoReference(String);

impl PhotoReference {
    pub fn new(reference: String) -> Self {
        Self(reference)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub user_id: UserId,
    pub reference: PhotoReference,
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}
