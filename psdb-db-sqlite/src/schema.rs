///////////////////////////////////////////////////////////////////////
// Spaces
///////////////////////////////////////////////////////////////////////

table! {
    space (rowid) {
        rowid -> BigInt,
        id -> Text,
        space_type -> SmallInt,
        street -> Text,
        number -> Text,
        city -> Text,
        map_link -> Nullable<Text>,
        lat -> Double,
        lng -> Double,
        geohash -> Text,
        description -> Text,
        created_at -> BigInt,
        created_by_id -> Text,
        created_by_name -> Text,
    }
}

table! {
    space_image (parent_rowid, position) {
        parent_rowid -> BigInt,
        position -> Integer,
        path -> Text,
    }
}

joinable!(space_image -> space (parent_rowid));

///////////////////////////////////////////////////////////////////////
// Comments
///////////////////////////////////////////////////////////////////////

table! {
    space_comment (rowid) {
        rowid -> BigInt,
        parent_rowid -> BigInt,
        id -> Text,
        created_at -> BigInt,
        created_by_id -> Text,
        created_by_name -> Text,
        text -> Text,
    }
}

joinable!(space_comment -> space (parent_rowid));

allow_tables_to_appear_in_same_query!(space, space_image, space_comment);
