use crate::model::id::BookId;

#[derive(Debug)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub cover_image_url: Option<String>,
    pub total_copies: i32,
}

#[derive(Debug)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub cover_image_url: Option<String>,
    pub total_copies: i32,
}

#[derive(Debug)]
pub struct DeleteBook {
    pub book_id: BookId,
}
