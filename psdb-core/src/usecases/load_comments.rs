use super::prelude::*;

/// Load a page of the comments of a space, newest first.
pub fn load_comments_of_space<R>(
    repo: &R,
    space_id: &str,
    page: &PageRequest,
) -> Result<Vec<Comment>>
where
    R: SpaceRepo + CommentRepo,
{
    let page = super::limited_page(page)?;
    // Fail for non-existent spaces instead of returning an empty page
    let _ = repo.get_space(space_id)?;
    Ok(repo.load_comments_of_space(space_id, &page)?)
}
