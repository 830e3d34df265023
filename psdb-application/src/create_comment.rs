use super::*;

pub fn create_comment(
    connections: &sqlite::Connections,
    new_comment: usecases::NewComment,
    created_by: Option<&UserRef>,
) -> Result<Comment> {
    let comment = connections.exclusive()?.transaction(|conn| {
        let storable = usecases::prepare_new_comment(conn, new_comment, created_by)?;
        usecases::store_new_comment(conn, storable).inspect_err(|err| {
            warn!("Failed to store new comment: {err}");
        })
    })?;
    debug!("Created comment {} of space {}", comment.id, comment.space_id);
    Ok(comment)
}
