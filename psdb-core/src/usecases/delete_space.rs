use super::prelude::*;

/// Delete a space together with all of its comments.
///
/// Only the creator of a space is allowed to delete it.
/// Returns the deleted space.
pub fn delete_space<R>(repo: &R, id: &str, deleted_by: Option<&UserRef>) -> Result<Space>
where
    R: SpaceRepo + CommentRepo,
{
    let user = super::signed_in(deleted_by)?;
    let space = repo.get_space(id)?;
    if !space.is_created_by(&user.id) {
        log::info!(
            "User {} is not allowed to delete space {} of user {}",
            user.id,
            space.id,
            space.created.by.id
        );
        return Err(Error::Forbidden);
    }
    let deleted_comments = repo.delete_comments_of_space(id)?;
    repo.delete_space(id)?;
    log::info!(
        "Deleted space {} and {} comment(s)",
        space.id,
        deleted_comments
    );
    Ok(space)
}
