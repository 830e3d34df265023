use super::*;
use psdb_entities::builders::*;

fn fixture() -> Connections {
    let connections = Connections::init(":memory:", 1).unwrap();
    run_embedded_database_migrations(connections.exclusive().unwrap()).unwrap();
    connections
}

fn user(name: &str) -> UserRef {
    UserRef {
        id: name.into(),
        display_name: name.to_uppercase(),
    }
}

#[test]
fn create_and_load_space() {
    let db = fixture();
    let space = Space::build()
        .id("tel-aviv-dizengoff-50")
        .space_type(SpaceType::Stairwell)
        .address("Dizengoff", "50", "Tel Aviv")
        .pos(MapPoint::from_lat_lng_deg(32.0853, 34.7818))
        .description("Ground floor")
        .image("door.jpg")
        .image("stairs.jpg")
        .created_by(&user("alice"))
        .created_at(TimestampMs::from_millis(1_700_000_000_123))
        .finish();
    let conn = db.exclusive().unwrap();
    conn.create_space_if_absent(&space).unwrap();
    let loaded = conn.get_space(space.id.as_str()).unwrap();
    // Coordinates are stored as floating point degrees
    assert!(MapPoint::distance(space.pos, loaded.pos).unwrap().to_meters() < 0.01);
    assert_eq!(space, Space { pos: space.pos, ..loaded });
    assert_eq!(1, conn.count_spaces().unwrap());
}

#[test]
fn create_space_only_if_absent() {
    let db = fixture();
    let conn = db.exclusive().unwrap();
    let first = Space::build().id("a").description("first").finish();
    let second = Space::build().id("a").description("second").finish();
    conn.create_space_if_absent(&first).unwrap();
    assert!(matches!(
        conn.create_space_if_absent(&second),
        Err(repo::Error::AlreadyExists)
    ));
    assert_eq!("first", conn.get_space("a").unwrap().description);
    assert!(conn.try_get_space("b").unwrap().is_none());
}

#[test]
fn update_space_replaces_images() {
    let db = fixture();
    let conn = db.exclusive().unwrap();
    let mut space = Space::build().id("a").image("1.jpg").finish();
    conn.create_space_if_absent(&space).unwrap();
    space.images = vec![
        ImageRef::new(&space.id, "2.jpg").unwrap(),
        ImageRef::new(&space.id, "1.jpg").unwrap(),
    ];
    space.description = "updated".into();
    conn.update_space(&space).unwrap();
    let loaded = conn.get_space("a").unwrap();
    assert_eq!(space.images, loaded.images);
    assert_eq!("updated", loaded.description);
    assert!(matches!(
        conn.update_space(&Space::build().id("missing").finish()),
        Err(repo::Error::NotFound)
    ));
}

#[test]
fn load_spaces_in_geohash_range() {
    let db = fixture();
    let conn = db.exclusive().unwrap();
    let near = Space::build()
        .id("near")
        .pos(MapPoint::from_lat_lng_deg(32.0855, 34.7820))
        .finish();
    let far = Space::build()
        .id("far")
        .pos(MapPoint::from_lat_lng_deg(32.15, 34.90))
        .finish();
    conn.create_space_if_absent(&near).unwrap();
    conn.create_space_if_absent(&far).unwrap();
    let center = MapPoint::from_lat_lng_deg(32.0853, 34.7818);
    let ids: Vec<_> = query_bounds(center, Distance::from_meters(300.0))
        .iter()
        .flat_map(|range| conn.load_spaces_in_geohash_range(range).unwrap())
        .map(|s| s.id)
        .collect();
    assert_eq!(vec![near.id], ids);
}

#[test]
fn paginate_spaces_of_user() {
    let db = fixture();
    let conn = db.exclusive().unwrap();
    let alice = user("alice");
    // a2 and a3 share the same timestamp
    for (i, secs) in [0, 1, 2, 2, 3].into_iter().enumerate() {
        conn.create_space_if_absent(
            &Space::build()
                .id(&format!("a{i}"))
                .created_by(&alice)
                .created_at(TimestampMs::from_secs(secs))
                .finish(),
        )
        .unwrap();
    }
    conn.create_space_if_absent(&Space::build().id("b").created_by(&user("bob")).finish())
        .unwrap();
    let first = conn
        .load_spaces_of_user("alice", &PageRequest::first(3))
        .unwrap();
    let ids: Vec<_> = first.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(vec!["a4", "a3", "a2"], ids);
    let rest = conn
        .load_spaces_of_user("alice", &PageRequest::after(first[2].cursor(), 3))
        .unwrap();
    let ids: Vec<_> = rest.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(vec!["a1", "a0"], ids);
    let recent = conn.recently_created_spaces(&PageRequest::first(1)).unwrap();
    assert_eq!("b", recent[0].id.as_str());
}

#[test]
fn comments_of_space() {
    let db = fixture();
    let conn = db.exclusive().unwrap();
    conn.create_space_if_absent(&Space::build().id("a").finish())
        .unwrap();
    conn.create_space_if_absent(&Space::build().id("b").finish())
        .unwrap();
    for i in 0..4 {
        conn.create_comment(
            &Comment::build()
                .id(&format!("c{i}"))
                .space_id("a")
                .text("x")
                .created_by(&user("alice"))
                .created_at(TimestampMs::from_secs(i))
                .finish(),
        )
        .unwrap();
    }
    conn.create_comment(&Comment::build().id("d").space_id("b").text("y").finish())
        .unwrap();
    assert!(matches!(
        conn.create_comment(&Comment::build().space_id("missing").text("z").finish()),
        Err(repo::Error::NotFound)
    ));

    let loaded = conn.load_comment("c1").unwrap();
    assert_eq!("a", loaded.space_id.as_str());
    assert_eq!(user("alice"), loaded.created.by);

    let page = conn
        .load_comments_of_space("a", &PageRequest::first(3))
        .unwrap();
    let ids: Vec<_> = page.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(vec!["c3", "c2", "c1"], ids);
    let page = conn
        .load_comments_of_space("a", &PageRequest::after(page[2].cursor(), 3))
        .unwrap();
    assert_eq!(1, page.len());

    assert_eq!(4, conn.count_comments_of_space("a").unwrap());
    assert_eq!(4, conn.delete_comments_of_space("a").unwrap());
    assert_eq!(0, conn.count_comments_of_space("a").unwrap());
    assert_eq!(1, conn.count_comments_of_space("b").unwrap());
}

#[test]
fn delete_space_with_images() {
    let db = fixture();
    let conn = db.exclusive().unwrap();
    conn.create_space_if_absent(&Space::build().id("a").image("1.jpg").finish())
        .unwrap();
    conn.delete_space("a").unwrap();
    assert!(matches!(conn.get_space("a"), Err(repo::Error::NotFound)));
    assert!(matches!(conn.delete_space("a"), Err(repo::Error::NotFound)));
}

#[test]
fn read_only_access_rejects_writes() {
    let db = fixture();
    {
        let conn = db.exclusive().unwrap();
        conn.create_space_if_absent(&Space::build().id("a").finish())
            .unwrap();
    }
    let conn = db.shared().unwrap();
    assert!(conn.get_space("a").is_ok());
    assert!(conn
        .create_space_if_absent(&Space::build().id("b").finish())
        .is_err());
    assert!(conn.delete_comments_of_space("a").is_err());
}

#[test]
fn rollback_failed_transactions() {
    let db = fixture();
    let mut conn = db.exclusive().unwrap();
    let result = conn.transaction(|tx| {
        tx.create_space_if_absent(&Space::build().id("a").finish())?;
        Err::<(), _>(uc::Error::Forbidden)
    });
    assert!(matches!(result, Err(uc::Error::Forbidden)));
    assert!(conn.try_get_space("a").unwrap().is_none());
}
