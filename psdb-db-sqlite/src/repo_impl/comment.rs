use super::*;

impl<'a> CommentRepo for DbReadWrite<'a> {
    fn create_comment(&self, comment: &Comment) -> Result<()> {
        create_comment(&mut self.conn.borrow_mut(), comment)
    }
    fn load_comment(&self, id: &str) -> Result<Comment> {
        load_comment(&mut self.conn.borrow_mut(), id)
    }
    fn load_comments_of_space(&self, space_id: &str, page: &PageRequest) -> Result<Vec<Comment>> {
        load_comments_of_space(&mut self.conn.borrow_mut(), space_id, page)
    }
    fn count_comments_of_space(&self, space_id: &str) -> Result<usize> {
        count_comments_of_space(&mut self.conn.borrow_mut(), space_id)
    }
    fn delete_comments_of_space(&self, space_id: &str) -> Result<usize> {
        delete_comments_of_space(&mut self.conn.borrow_mut(), space_id)
    }
}

impl<'a> CommentRepo for DbConnection<'a> {
    fn create_comment(&self, comment: &Comment) -> Result<()> {
        create_comment(&mut self.conn.borrow_mut(), comment)
    }
    fn load_comment(&self, id: &str) -> Result<Comment> {
        load_comment(&mut self.conn.borrow_mut(), id)
    }
    fn load_comments_of_space(&self, space_id: &str, page: &PageRequest) -> Result<Vec<Comment>> {
        load_comments_of_space(&mut self.conn.borrow_mut(), space_id, page)
    }
    fn count_comments_of_space(&self, space_id: &str) -> Result<usize> {
        count_comments_of_space(&mut self.conn.borrow_mut(), space_id)
    }
    fn delete_comments_of_space(&self, space_id: &str) -> Result<usize> {
        delete_comments_of_space(&mut self.conn.borrow_mut(), space_id)
    }
}

impl<'a> CommentRepo for DbReadOnly<'a> {
    fn create_comment(&self, _comment: &Comment) -> Result<()> {
        Err(read_only_err())
    }
    fn load_comment(&self, id: &str) -> Result<Comment> {
        load_comment(&mut self.conn.borrow_mut(), id)
    }
    fn load_comments_of_space(&self, space_id: &str, page: &PageRequest) -> Result<Vec<Comment>> {
        load_comments_of_space(&mut self.conn.borrow_mut(), space_id, page)
    }
    fn count_comments_of_space(&self, space_id: &str) -> Result<usize> {
        count_comments_of_space(&mut self.conn.borrow_mut(), space_id)
    }
    fn delete_comments_of_space(&self, _space_id: &str) -> Result<usize> {
        Err(read_only_err())
    }
}

impl From<models::SpaceComment> for Comment {
    fn from(from: models::SpaceComment) -> Self {
        let models::SpaceComment {
            id,
            created_at,
            created_by_id,
            created_by_name,
            text,
            space_id,
        } = from;
        Self {
            id: id.into(),
            space_id: space_id.into(),
            text,
            created: Activity {
                at: TimestampMs::from_millis(created_at),
                by: UserRef {
                    id: created_by_id.into(),
                    display_name: created_by_name,
                },
            },
        }
    }
}

fn create_comment(conn: &mut SqliteConnection, comment: &Comment) -> Result<()> {
    let Comment {
        id,
        space_id,
        text,
        created,
    } = comment;
    let parent_rowid = resolve_space_rowid(conn, space_id.as_str())?;
    let new_comment = models::NewSpaceComment {
        parent_rowid,
        id: id.as_str(),
        created_at: created.at.as_millis(),
        created_by_id: created.by.id.as_str(),
        created_by_name: &created.by.display_name,
        text,
    };
    let _count = diesel::insert_into(schema::space_comment::table)
        .values(&new_comment)
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(1, _count);
    Ok(())
}

fn load_comment(conn: &mut SqliteConnection, id: &str) -> Result<Comment> {
    use schema::{space::dsl as space_dsl, space_comment::dsl as comment_dsl};
    Ok(schema::space_comment::table
        .inner_join(schema::space::table)
        .select((
            comment_dsl::id,
            comment_dsl::created_at,
            comment_dsl::created_by_id,
            comment_dsl::created_by_name,
            comment_dsl::text,
            space_dsl::id,
        ))
        .filter(comment_dsl::id.eq(id))
        .first::<models::SpaceComment>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn load_comments_of_space(
    conn: &mut SqliteConnection,
    space_id: &str,
    page: &PageRequest,
) -> Result<Vec<Comment>> {
    use schema::{space::dsl as space_dsl, space_comment::dsl as comment_dsl};
    let mut query = schema::space_comment::table
        .inner_join(schema::space::table)
        .select((
            comment_dsl::id,
            comment_dsl::created_at,
            comment_dsl::created_by_id,
            comment_dsl::created_by_name,
            comment_dsl::text,
            space_dsl::id,
        ))
        .filter(space_dsl::id.eq(space_id))
        .into_boxed();
    if let Some(cursor) = &page.after {
        let created_at = cursor.created_at.as_millis();
        query = query.filter(
            comment_dsl::created_at.lt(created_at).or(comment_dsl::created_at
                .eq(created_at)
                .and(comment_dsl::id.lt(cursor.id.as_str()))),
        );
    }
    query = query.order_by((comment_dsl::created_at.desc(), comment_dsl::id.desc()));
    if let Some(limit) = page.limit {
        query = query.limit(limit as i64);
    }
    Ok(query
        .load::<models::SpaceComment>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn count_comments_of_space(conn: &mut SqliteConnection, space_id: &str) -> Result<usize> {
    use schema::{space::dsl as space_dsl, space_comment::dsl as comment_dsl};
    Ok(schema::space_comment::table
        .filter(
            comment_dsl::parent_rowid.eq_any(
                schema::space::table
                    .select(space_dsl::rowid)
                    .filter(space_dsl::id.eq(space_id)),
            ),
        )
        .select(diesel::dsl::count(comment_dsl::rowid))
        .first::<i64>(conn)
        .map_err(from_diesel_err)? as usize)
}

fn delete_comments_of_space(conn: &mut SqliteConnection, space_id: &str) -> Result<usize> {
    use schema::{space::dsl as space_dsl, space_comment::dsl as comment_dsl};
    diesel::delete(
        schema::space_comment::table.filter(
            comment_dsl::parent_rowid.eq_any(
                schema::space::table
                    .select(space_dsl::rowid)
                    .filter(space_dsl::id.eq(space_id)),
            ),
        ),
    )
    .execute(conn)
    .map_err(from_diesel_err)
}
