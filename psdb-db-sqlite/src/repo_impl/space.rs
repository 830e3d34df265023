use super::*;

impl<'a> SpaceRepo for DbReadWrite<'a> {
    fn create_space_if_absent(&self, space: &Space) -> Result<()> {
        create_space_if_absent(&mut self.conn.borrow_mut(), space)
    }
    fn update_space(&self, space: &Space) -> Result<()> {
        update_space(&mut self.conn.borrow_mut(), space)
    }
    fn delete_space(&self, id: &str) -> Result<()> {
        delete_space(&mut self.conn.borrow_mut(), id)
    }
    fn get_space(&self, id: &str) -> Result<Space> {
        get_space(&mut self.conn.borrow_mut(), id)
    }
    fn count_spaces(&self) -> Result<usize> {
        count_spaces(&mut self.conn.borrow_mut())
    }
    fn load_spaces_in_geohash_range(&self, range: &GeohashRange) -> Result<Vec<Space>> {
        load_spaces_in_geohash_range(&mut self.conn.borrow_mut(), range)
    }
    fn recently_created_spaces(&self, page: &PageRequest) -> Result<Vec<Space>> {
        load_spaces_page(&mut self.conn.borrow_mut(), None, page)
    }
    fn load_spaces_of_user(&self, user_id: &str, page: &PageRequest) -> Result<Vec<Space>> {
        load_spaces_page(&mut self.conn.borrow_mut(), Some(user_id), page)
    }
}

impl<'a> SpaceRepo for DbConnection<'a> {
    fn create_space_if_absent(&self, space: &Space) -> Result<()> {
        create_space_if_absent(&mut self.conn.borrow_mut(), space)
    }
    fn update_space(&self, space: &Space) -> Result<()> {
        update_space(&mut self.conn.borrow_mut(), space)
    }
    fn delete_space(&self, id: &str) -> Result<()> {
        delete_space(&mut self.conn.borrow_mut(), id)
    }
    fn get_space(&self, id: &str) -> Result<Space> {
        get_space(&mut self.conn.borrow_mut(), id)
    }
    fn count_spaces(&self) -> Result<usize> {
        count_spaces(&mut self.conn.borrow_mut())
    }
    fn load_spaces_in_geohash_range(&self, range: &GeohashRange) -> Result<Vec<Space>> {
        load_spaces_in_geohash_range(&mut self.conn.borrow_mut(), range)
    }
    fn recently_created_spaces(&self, page: &PageRequest) -> Result<Vec<Space>> {
        load_spaces_page(&mut self.conn.borrow_mut(), None, page)
    }
    fn load_spaces_of_user(&self, user_id: &str, page: &PageRequest) -> Result<Vec<Space>> {
        load_spaces_page(&mut self.conn.borrow_mut(), Some(user_id), page)
    }
}

impl<'a> SpaceRepo for DbReadOnly<'a> {
    fn create_space_if_absent(&self, _space: &Space) -> Result<()> {
        Err(read_only_err())
    }
    fn update_space(&self, _space: &Space) -> Result<()> {
        Err(read_only_err())
    }
    fn delete_space(&self, _id: &str) -> Result<()> {
        Err(read_only_err())
    }
    fn get_space(&self, id: &str) -> Result<Space> {
        get_space(&mut self.conn.borrow_mut(), id)
    }
    fn count_spaces(&self) -> Result<usize> {
        count_spaces(&mut self.conn.borrow_mut())
    }
    fn load_spaces_in_geohash_range(&self, range: &GeohashRange) -> Result<Vec<Space>> {
        load_spaces_in_geohash_range(&mut self.conn.borrow_mut(), range)
    }
    fn recently_created_spaces(&self, page: &PageRequest) -> Result<Vec<Space>> {
        load_spaces_page(&mut self.conn.borrow_mut(), None, page)
    }
    fn load_spaces_of_user(&self, user_id: &str, page: &PageRequest) -> Result<Vec<Space>> {
        load_spaces_page(&mut self.conn.borrow_mut(), Some(user_id), page)
    }
}

fn create_space_if_absent(conn: &mut SqliteConnection, space: &Space) -> Result<()> {
    let new_space = into_new_space(space)?;
    // Fails with a unique constraint violation if the id is already taken
    let _count = diesel::insert_into(schema::space::table)
        .values(&new_space)
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(1, _count);
    let rowid = resolve_space_rowid(conn, space.id.as_str())?;
    insert_space_images(conn, rowid, &space.images)
}

fn update_space(conn: &mut SqliteConnection, space: &Space) -> Result<()> {
    use schema::space::dsl;
    let rowid = resolve_space_rowid(conn, space.id.as_str())?;
    let changeset = into_new_space(space)?;
    let _count = diesel::update(schema::space::table.filter(dsl::rowid.eq(rowid)))
        .set(&changeset)
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(1, _count);
    delete_space_images(conn, rowid)?;
    insert_space_images(conn, rowid, &space.images)
}

fn delete_space(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    use schema::space::dsl;
    let rowid = resolve_space_rowid(conn, id)?;
    delete_space_images(conn, rowid)?;
    let count = diesel::delete(schema::space::table.filter(dsl::rowid.eq(rowid)))
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    Ok(())
}

fn get_space(conn: &mut SqliteConnection, id: &str) -> Result<Space> {
    use schema::space::dsl;
    let space = schema::space::table
        .filter(dsl::id.eq(id))
        .first::<models::Space>(conn)
        .map_err(from_diesel_err)?;
    load_space(conn, space)
}

fn count_spaces(conn: &mut SqliteConnection) -> Result<usize> {
    Ok(schema::space::table
        .select(diesel::dsl::count(schema::space::dsl::rowid))
        .first::<i64>(conn)
        .map_err(from_diesel_err)? as usize)
}

fn load_spaces(conn: &mut SqliteConnection, spaces: Vec<models::Space>) -> Result<Vec<Space>> {
    spaces
        .into_iter()
        .map(|space| load_space(conn, space))
        .collect()
}

fn load_spaces_in_geohash_range(
    conn: &mut SqliteConnection,
    range: &GeohashRange,
) -> Result<Vec<Space>> {
    use schema::space::dsl;
    let spaces = schema::space::table
        .filter(dsl::geohash.ge(range.start.as_str()))
        .filter(dsl::geohash.le(range.end.as_str()))
        .order_by(dsl::geohash)
        .load::<models::Space>(conn)
        .map_err(from_diesel_err)?;
    log::debug!("Loaded {} space(s) in geohash range {range}", spaces.len());
    load_spaces(conn, spaces)
}

fn load_spaces_page(
    conn: &mut SqliteConnection,
    created_by_id: Option<&str>,
    page: &PageRequest,
) -> Result<Vec<Space>> {
    use schema::space::dsl;
    let mut query = schema::space::table.into_boxed();
    if let Some(created_by_id) = created_by_id {
        query = query.filter(dsl::created_by_id.eq(created_by_id));
    }
    if let Some(cursor) = &page.after {
        let created_at = cursor.created_at.as_millis();
        query = query.filter(
            dsl::created_at.lt(created_at).or(dsl::created_at
                .eq(created_at)
                .and(dsl::id.lt(cursor.id.as_str()))),
        );
    }
    query = query.order_by((dsl::created_at.desc(), dsl::id.desc()));
    if let Some(limit) = page.limit {
        query = query.limit(limit as i64);
    }
    let spaces = query
        .load::<models::Space>(conn)
        .map_err(from_diesel_err)?;
    load_spaces(conn, spaces)
}
