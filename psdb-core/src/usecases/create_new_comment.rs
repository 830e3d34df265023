use super::prelude::*;
use crate::util::validate::Validate;

#[derive(Debug, Clone)]
pub struct NewComment {
    pub space_id: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Storable(Comment);

pub fn prepare_new_comment<R: SpaceRepo>(
    repo: &R,
    new_comment: NewComment,
    created_by: Option<&UserRef>,
) -> Result<Storable> {
    let created_by = super::signed_in(created_by)?;
    let NewComment { space_id, text } = new_comment;
    let space = repo.get_space(&space_id)?;
    let comment = Comment {
        id: Id::new(),
        space_id: space.id,
        text: text.trim().to_owned(),
        created: Activity::now(created_by.clone()),
    };
    comment.validate()?;
    Ok(Storable(comment))
}

pub fn store_new_comment<R: CommentRepo>(repo: &R, s: Storable) -> Result<Comment> {
    let Storable(comment) = s;
    log::debug!("Storing new comment {} of space {}", comment.id, comment.space_id);
    repo.create_comment(&comment)?;
    Ok(comment)
}
