use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum LocalEntry {
    Table,
    Key,
    Value,
    UpdatedAt,
}
