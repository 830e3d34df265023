use crate::repositories::*;

pub trait Db: SpaceRepo + CommentRepo {}

impl<T> Db for T where T: SpaceRepo + CommentRepo {}
