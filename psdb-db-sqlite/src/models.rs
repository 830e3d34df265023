#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = space)]
#[diesel(treat_none_as_null = true)]
pub struct NewSpace<'a> {
    pub id: &'a str,
    pub space_type: i16,
    pub street: &'a str,
    pub number: &'a str,
    pub city: &'a str,
    pub map_link: Option<&'a str>,
    pub lat: f64,
    pub lng: f64,
    pub geohash: &'a str,
    pub description: &'a str,
    pub created_at: i64,
    pub created_by_id: &'a str,
    pub created_by_name: &'a str,
}

#[derive(Queryable)]
pub struct Space {
    pub rowid: i64,
    pub id: String,
    pub space_type: i16,
    pub street: String,
    pub number: String,
    pub city: String,
    pub map_link: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub geohash: String,
    pub description: String,
    pub created_at: i64,
    pub created_by_id: String,
    pub created_by_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = space_image)]
pub struct NewSpaceImage<'a> {
    pub parent_rowid: i64,
    pub position: i32,
    pub path: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = space_comment)]
pub struct NewSpaceComment<'a> {
    pub parent_rowid: i64,
    pub id: &'a str,
    pub created_at: i64,
    pub created_by_id: &'a str,
    pub created_by_name: &'a str,
    pub text: &'a str,
}

#[derive(Queryable)]
pub struct SpaceComment {
    pub id: String,
    pub created_at: i64,
    pub created_by_id: String,
    pub created_by_name: String,
    pub text: String,

    pub space_id: String,
}
