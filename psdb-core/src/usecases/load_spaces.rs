use super::prelude::*;

pub fn load_space<R: SpaceRepo>(repo: &R, id: &str) -> Result<Space> {
    Ok(repo.get_space(id)?)
}

pub fn recently_created_spaces<R: SpaceRepo>(repo: &R, page: &PageRequest) -> Result<Vec<Space>> {
    let page = super::limited_page(page)?;
    Ok(repo.recently_created_spaces(&page)?)
}

pub fn load_spaces_of_user<R: SpaceRepo>(
    repo: &R,
    user_id: &str,
    page: &PageRequest,
) -> Result<Vec<Space>> {
    let page = super::limited_page(page)?;
    Ok(repo.load_spaces_of_user(user_id, &page)?)
}

/// Load the projections of all spaces that have been created by a user.
pub fn load_all_user_spaces<R: SpaceRepo>(repo: &R, user_id: &str) -> Result<Vec<UserSpace>> {
    let mut user_spaces = vec![];
    let mut page = PageRequest::first(super::MAX_PAGE_SIZE);
    loop {
        let spaces = repo.load_spaces_of_user(user_id, &page)?;
        let complete = (spaces.len() as u64) < super::MAX_PAGE_SIZE;
        user_spaces.extend(spaces.iter().map(UserSpace::from));
        match spaces.last() {
            Some(last) if !complete => {
                page.after = Some(last.cursor());
            }
            _ => break,
        }
    }
    Ok(user_spaces)
}
