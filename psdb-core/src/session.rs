//! State of a user session on a device.
//!
//! The session owns all local state containers: the auth state,
//! the current location, the search radius, the cached "my spaces"
//! list and the paginated lists of spaces and comments.
//! Caches are read-through and invalidated wholesale on sign-out.

use std::collections::HashMap;

use crate::{
    entities::*,
    gateways::{auth::AuthState, device::DeviceStore},
    pagination::{CommentsOfSpace, ListAction, Page, PaginatedList, RecentSpaces},
    repositories::{CommentRepo, PageRequest, SpaceRepo},
    usecases::{self, Error, NearbySpace},
};

type Result<T> = std::result::Result<T, Error>;

pub struct Session<'a> {
    device: &'a dyn DeviceStore,
    auth: AuthState,
    location: Option<MapPoint>,
    search_radius: Distance,
    page_size: u64,
    user_spaces: Option<Vec<UserSpace>>,
    recent_spaces: PaginatedList<Space>,
    comments: HashMap<Id, PaginatedList<Comment>>,
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth", &self.auth)
            .field("location", &self.location)
            .field("search_radius", &self.search_radius)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<'a> Session<'a> {
    /// Restore the persisted state from the device.
    pub fn restore(
        device: &'a dyn DeviceStore,
        default_radius: Distance,
        page_size: u64,
    ) -> Result<Self> {
        let search_radius = device
            .load_search_radius()
            .map_err(Error::Gateway)?
            .filter(|r| usecases::is_valid_radius(*r))
            .unwrap_or(default_radius);
        let auth = AuthState::from(device.load_signed_in_user().map_err(Error::Gateway)?);
        let user_spaces = if auth.is_signed_in() {
            device.load_user_spaces().map_err(Error::Gateway)?
        } else {
            None
        };
        Ok(Self {
            device,
            auth,
            location: None,
            search_radius,
            page_size,
            user_spaces,
            recent_spaces: Default::default(),
            comments: Default::default(),
        })
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    pub fn current_user(&self) -> Option<&UserRef> {
        self.auth.user()
    }

    /// Mirror a new sign-in state.
    ///
    /// Signing out clears all cached data of the user, both in memory
    /// and on the device. Signing in repopulates "my spaces" from
    /// the repository.
    pub fn apply_auth_state<R: SpaceRepo>(&mut self, repo: &R, auth: AuthState) -> Result<()> {
        if auth == self.auth {
            return Ok(());
        }
        self.invalidate_user_data()?;
        self.device
            .save_signed_in_user(auth.user())
            .map_err(Error::Gateway)?;
        self.auth = auth;
        if self.auth.is_signed_in() {
            self.refresh_user_spaces(repo)?;
        }
        Ok(())
    }

    fn invalidate_user_data(&mut self) -> Result<()> {
        log::debug!("Invalidating cached user data");
        self.user_spaces = None;
        self.recent_spaces.clear();
        self.comments.clear();
        self.device.clear_user_spaces().map_err(Error::Gateway)
    }

    pub fn location(&self) -> Option<MapPoint> {
        self.location
    }

    pub fn update_location(&mut self, pos: MapPoint) -> Result<()> {
        if !pos.is_valid() {
            return Err(Error::InvalidPosition);
        }
        self.location = Some(pos);
        Ok(())
    }

    pub fn search_radius(&self) -> Distance {
        self.search_radius
    }

    pub fn set_search_radius(&mut self, radius: Distance) -> Result<()> {
        if !usecases::is_valid_radius(radius) {
            return Err(Error::InvalidRadius);
        }
        self.device
            .save_search_radius(radius)
            .map_err(Error::Gateway)?;
        self.search_radius = radius;
        Ok(())
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Spaces within the search radius around the current location.
    pub fn nearby_spaces<R: SpaceRepo>(&self, repo: &R) -> Result<Vec<NearbySpace>> {
        let center = self.location.ok_or(Error::MissingLocation)?;
        usecases::find_nearby_spaces(repo, center, self.search_radius)
    }

    /// The spaces of the signed-in user, loaded on first access.
    pub fn user_spaces<R: SpaceRepo>(&mut self, repo: &R) -> Result<&[UserSpace]> {
        if self.user_spaces.is_none() {
            return self.refresh_user_spaces(repo);
        }
        Ok(self.user_spaces.as_deref().unwrap_or_default())
    }

    pub fn refresh_user_spaces<R: SpaceRepo>(&mut self, repo: &R) -> Result<&[UserSpace]> {
        let user = self.auth.user().ok_or(Error::Unauthorized)?;
        let user_spaces = usecases::load_all_user_spaces(repo, user.id.as_str())?;
        log::debug!(
            "Loaded {} space(s) of user {}",
            user_spaces.len(),
            user.id
        );
        self.device
            .save_user_spaces(&user_spaces)
            .map_err(Error::Gateway)?;
        Ok(self.user_spaces.insert(user_spaces).as_slice())
    }

    /// Add a space that has just been created by the signed-in user.
    pub fn remember_user_space(&mut self, space: &Space) -> Result<()> {
        let Some(user_spaces) = self.user_spaces.as_mut() else {
            // Will be loaded on next access
            return Ok(());
        };
        user_spaces.retain(|s| s.id != space.id);
        user_spaces.insert(0, space.into());
        self.device
            .save_user_spaces(user_spaces)
            .map_err(Error::Gateway)
    }

    pub fn forget_user_space(&mut self, id: &Id) -> Result<()> {
        self.comments.remove(id);
        let Some(user_spaces) = self.user_spaces.as_mut() else {
            return Ok(());
        };
        user_spaces.retain(|s| s.id != *id);
        self.device
            .save_user_spaces(user_spaces)
            .map_err(Error::Gateway)
    }

    pub fn recent_spaces(&self) -> &PaginatedList<Space> {
        &self.recent_spaces
    }

    pub fn load_recent_spaces<R: SpaceRepo>(&mut self, repo: &R) -> Result<usize> {
        self.recent_spaces
            .load_initial(&RecentSpaces { repo }, self.page_size)
    }

    pub fn load_more_recent_spaces<R: SpaceRepo>(&mut self, repo: &R) -> Result<usize> {
        self.recent_spaces
            .load_more(&RecentSpaces { repo }, self.page_size)
    }

    pub fn comments(&self, space_id: &Id) -> Option<&PaginatedList<Comment>> {
        self.comments.get(space_id)
    }

    pub fn load_comments<R>(&mut self, repo: &R, space_id: &Id) -> Result<usize>
    where
        R: SpaceRepo + CommentRepo,
    {
        let source = CommentsOfSpace {
            repo,
            space_id: space_id.as_str(),
        };
        self.comments
            .entry(space_id.clone())
            .or_default()
            .load_initial(&source, self.page_size)
    }

    /// Load the next page of comments.
    ///
    /// Starts after `after` if given, otherwise after the
    /// cursor of the comments that have already been loaded.
    pub fn load_more_comments<R>(
        &mut self,
        repo: &R,
        space_id: &Id,
        after: Option<PageCursor>,
    ) -> Result<usize>
    where
        R: SpaceRepo + CommentRepo,
    {
        let list = self.comments.entry(space_id.clone()).or_default();
        if let Some(after) = after {
            let page = PageRequest::after(after, self.page_size);
            let items = usecases::load_comments_of_space(repo, space_id.as_str(), &page)?;
            let count = items.len();
            let action = ListAction::Appended(Page::new(items, self.page_size));
            *list = std::mem::take(list).reduce(action);
            return Ok(count);
        }
        let source = CommentsOfSpace {
            repo,
            space_id: space_id.as_str(),
        };
        list.load_more(&source, self.page_size)
    }
}
