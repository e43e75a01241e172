pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_identity_tables;
mod m20250601_000002_create_course_tables;
mod m20250601_000003_create_assessment_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_identity_tables::Migration),
            Box::new(m20250601_000002_create_course_tables::Migration),
            Box::new(m20250601_000003_create_assessment_tables::Migration),
        ]
    }
}

/// 自增主键列
pub(crate) fn pk_column<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// 唯一复合索引
pub(crate) fn unique_index<T, C>(name: &str, table: T, cols: Vec<C>) -> IndexCreateStatement
where
    T: IntoIden,
    C: IntoIden,
{
    let mut index = Index::create();
    index.if_not_exists().name(name).table(table).unique();
    for col in cols {
        index.col(col);
    }
    index.to_owned()
}

/// 普通索引
pub(crate) fn plain_index<T, C>(name: &str, table: T, col: C) -> IndexCreateStatement
where
    T: IntoIden,
    C: IntoIden,
{
    Index::create()
        .if_not_exists()
        .name(name)
        .table(table)
        .col(col)
        .to_owned()
}
