pub mod champions;
pub mod overview;
pub mod summoner;
