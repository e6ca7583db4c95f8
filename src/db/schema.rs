//! Database schema and migrations for gnubridge.
//!
//! Table and column names follow the legacy Gnuboard layout so that the
//! PHP site can keep reading the same rows.

#[cfg(feature = "sqlite")]
macro_rules! serial_pk {
    () => {
        "INTEGER PRIMARY KEY AUTOINCREMENT"
    };
}

#[cfg(feature = "postgres")]
macro_rules! serial_pk {
    () => {
        "BIGSERIAL PRIMARY KEY"
    };
}

pub(crate) use serial_pk;

/// Database migrations, applied in order and tracked in `schema_version`.
pub const MIGRATIONS: &[&str] = &[
    // v1: board configuration
    r#"
CREATE TABLE g5_board (
    bo_table          TEXT NOT NULL PRIMARY KEY,
    gr_id             TEXT NOT NULL DEFAULT '',
    bo_subject        TEXT NOT NULL DEFAULT '',
    bo_admin          TEXT NOT NULL DEFAULT '',
    bo_device         TEXT NOT NULL DEFAULT 'both',
    bo_list_level     BIGINT NOT NULL DEFAULT 1,
    bo_read_level     BIGINT NOT NULL DEFAULT 1,
    bo_write_level    BIGINT NOT NULL DEFAULT 1,
    bo_reply_level    BIGINT NOT NULL DEFAULT 1,
    bo_comment_level  BIGINT NOT NULL DEFAULT 1,
    bo_use_category   BIGINT NOT NULL DEFAULT 0,
    bo_category_list  TEXT NOT NULL DEFAULT '',
    bo_skin           TEXT NOT NULL DEFAULT 'basic',
    bo_mobile_skin    TEXT NOT NULL DEFAULT 'basic',
    bo_page_rows      BIGINT NOT NULL DEFAULT 15,
    bo_upload_count   BIGINT NOT NULL DEFAULT 2,
    bo_upload_size    BIGINT NOT NULL DEFAULT 1048576,
    bo_notice         TEXT NOT NULL DEFAULT '',
    bo_order          BIGINT NOT NULL DEFAULT 0,
    bo_count_write    BIGINT NOT NULL DEFAULT 0,
    bo_count_comment  BIGINT NOT NULL DEFAULT 0,
    bo_insert_time    TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_g5_board_gr_id ON g5_board(gr_id);
"#,
    // v2: members
    concat!(
        r#"
CREATE TABLE g5_member (
    mb_no             "#,
        serial_pk!(),
        r#",
    mb_id             TEXT NOT NULL UNIQUE,
    mb_password       TEXT NOT NULL DEFAULT '',
    mb_name           TEXT NOT NULL DEFAULT '',
    mb_nick           TEXT NOT NULL DEFAULT '',
    mb_email          TEXT NOT NULL DEFAULT '',
    mb_level          BIGINT NOT NULL DEFAULT 1,
    mb_point          BIGINT NOT NULL DEFAULT 0,
    mb_today_login    TEXT NOT NULL DEFAULT '',
    mb_login_ip       TEXT NOT NULL DEFAULT '',
    mb_datetime       TEXT NOT NULL DEFAULT ''
);
"#
    ),
    // v3: board-scoped auxiliary indexes
    concat!(
        r#"
CREATE TABLE g5_board_file (
    bo_table          TEXT NOT NULL,
    wr_id             BIGINT NOT NULL,
    bf_no             BIGINT NOT NULL,
    bf_source         TEXT NOT NULL DEFAULT '',
    bf_file           TEXT NOT NULL DEFAULT '',
    bf_filesize       BIGINT NOT NULL DEFAULT 0,
    bf_datetime       TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (bo_table, wr_id, bf_no)
);

CREATE TABLE g5_board_new (
    bn_id             "#,
        serial_pk!(),
        r#",
    bo_table          TEXT NOT NULL DEFAULT '',
    wr_id             BIGINT NOT NULL DEFAULT 0,
    wr_parent         BIGINT NOT NULL DEFAULT 0,
    bn_datetime       TEXT NOT NULL DEFAULT '',
    mb_id             TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_g5_board_new_bo_table ON g5_board_new(bo_table);
"#
    ),
    // v4: site navigation
    concat!(
        r#"
CREATE TABLE menus (
    id                "#,
        serial_pk!(),
        r#",
    parent_id         BIGINT,
    title             TEXT NOT NULL DEFAULT '',
    url               TEXT NOT NULL DEFAULT '',
    icon              TEXT NOT NULL DEFAULT '',
    shortcut          TEXT NOT NULL DEFAULT '',
    description       TEXT NOT NULL DEFAULT '',
    depth             BIGINT NOT NULL DEFAULT 1,
    order_num         BIGINT NOT NULL DEFAULT 0,
    is_active         BOOLEAN NOT NULL DEFAULT TRUE,
    target            TEXT NOT NULL DEFAULT '_self',
    view_level        BIGINT NOT NULL DEFAULT 1,
    show_in_header    BOOLEAN NOT NULL DEFAULT FALSE,
    show_in_sidebar   BOOLEAN NOT NULL DEFAULT TRUE,
    created_at        TEXT NOT NULL DEFAULT '',
    updated_at        TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_menus_depth_order ON menus(depth, order_num);
"#
    ),
];
