//! Local cache of a paginated list.
//!
//! The list state is a value type that is only modified by
//! reducing actions. Fetching pages and applying the results
//! are separate steps.

use std::mem;

use crate::{
    entities::*,
    repositories::{CommentRepo, PageRequest, SpaceRepo},
    usecases::{self, Error},
};

type Result<T> = std::result::Result<T, Error>;

/// Items that can be ordered and resumed by a cursor.
pub trait Paginated {
    fn cursor(&self) -> PageCursor;
}

impl Paginated for Space {
    fn cursor(&self) -> PageCursor {
        Space::cursor(self)
    }
}

impl Paginated for Comment {
    fn cursor(&self) -> PageCursor {
        Comment::cursor(self)
    }
}

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Points at the last item if more items might follow.
    pub next: Option<PageCursor>,
}

impl<T: Paginated> Page<T> {
    /// A page that is shorter than requested is the last one.
    pub fn new(items: Vec<T>, page_size: u64) -> Self {
        let next = if items.len() as u64 >= page_size {
            items.last().map(Paginated::cursor)
        } else {
            None
        };
        Self { items, next }
    }
}

pub trait PageSource<T> {
    fn fetch_page(&self, page: &PageRequest) -> Result<Vec<T>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction<T> {
    Replaced(Page<T>),
    Appended(Page<T>),
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedList<T> {
    items: Vec<T>,
    cursor: Option<PageCursor>,
}

impl<T> Default for PaginatedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }
}

impl<T> PaginatedList<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn reduce(self, action: ListAction<T>) -> Self {
        match action {
            ListAction::Replaced(Page { items, next }) => Self {
                items,
                cursor: next,
            },
            ListAction::Appended(Page { items, next }) => {
                let Self {
                    items: mut all_items,
                    ..
                } = self;
                all_items.extend(items);
                Self {
                    items: all_items,
                    cursor: next,
                }
            }
            ListAction::Cleared => Self::default(),
        }
    }

    fn apply(&mut self, action: ListAction<T>) {
        *self = mem::take(self).reduce(action);
    }

    pub fn clear(&mut self) {
        self.apply(ListAction::Cleared);
    }
}

fn check_page_size(page_size: u64) -> Result<()> {
    if page_size == 0 || page_size > usecases::MAX_PAGE_SIZE {
        return Err(Error::InvalidLimit);
    }
    Ok(())
}

/// Fetch the first page.
pub fn fetch_initial<T, S>(source: &S, page_size: u64) -> Result<ListAction<T>>
where
    T: Paginated,
    S: PageSource<T> + ?Sized,
{
    check_page_size(page_size)?;
    let items = source.fetch_page(&PageRequest::first(page_size))?;
    Ok(ListAction::Replaced(Page::new(items, page_size)))
}

/// Fetch the page after the cursor of the list.
///
/// Returns `None` without fetching anything if the
/// list has no cursor.
pub fn fetch_more<T, S>(
    list: &PaginatedList<T>,
    source: &S,
    page_size: u64,
) -> Result<Option<ListAction<T>>>
where
    T: Paginated,
    S: PageSource<T> + ?Sized,
{
    let Some(cursor) = list.cursor() else {
        return Ok(None);
    };
    check_page_size(page_size)?;
    let items = source.fetch_page(&PageRequest::after(cursor.clone(), page_size))?;
    Ok(Some(ListAction::Appended(Page::new(items, page_size))))
}

impl<T: Paginated> PaginatedList<T> {
    /// Replace the contents with the first page.
    ///
    /// Returns the number of fetched items.
    pub fn load_initial<S>(&mut self, source: &S, page_size: u64) -> Result<usize>
    where
        S: PageSource<T> + ?Sized,
    {
        let action = fetch_initial(source, page_size)?;
        let count = match &action {
            ListAction::Replaced(page) => page.items.len(),
            _ => 0,
        };
        self.apply(action);
        Ok(count)
    }

    /// Append the next page, if any.
    ///
    /// Returns the number of fetched items.
    pub fn load_more<S>(&mut self, source: &S, page_size: u64) -> Result<usize>
    where
        S: PageSource<T> + ?Sized,
    {
        let Some(action) = fetch_more(self, source, page_size)? else {
            return Ok(0);
        };
        let count = match &action {
            ListAction::Appended(page) => page.items.len(),
            _ => 0,
        };
        self.apply(action);
        Ok(count)
    }
}

#[derive(Debug)]
pub struct CommentsOfSpace<'a, R> {
    pub repo: &'a R,
    pub space_id: &'a str,
}

impl<R> PageSource<Comment> for CommentsOfSpace<'_, R>
where
    R: SpaceRepo + CommentRepo,
{
    fn fetch_page(&self, page: &PageRequest) -> Result<Vec<Comment>> {
        usecases::load_comments_of_space(self.repo, self.space_id, page)
    }
}

#[derive(Debug)]
pub struct SpacesOfUser<'a, R> {
    pub repo: &'a R,
    pub user_id: &'a str,
}

impl<R: SpaceRepo> PageSource<Space> for SpacesOfUser<'_, R> {
    fn fetch_page(&self, page: &PageRequest) -> Result<Vec<Space>> {
        usecases::load_spaces_of_user(self.repo, self.user_id, page)
    }
}

#[derive(Debug)]
pub struct RecentSpaces<'a, R> {
    pub repo: &'a R,
}

impl<R: SpaceRepo> PageSource<Space> for RecentSpaces<'_, R> {
    fn fetch_page(&self, page: &PageRequest) -> Result<Vec<Space>> {
        usecases::recently_created_spaces(self.repo, page)
    }
}
