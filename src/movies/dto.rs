use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub color: bool,
    pub duration: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub color: Option<bool>,
    pub duration: Option<f64>,
}

/// Query-string filters for the movie list.
#[derive(Debug, Default, Deserialize)]
pub struct MovieListQuery {
    pub color: Option<bool>,
    pub max_duration: Option<f64>,
}
