use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"create table "song_record" (
                "id" uuid primary key,
                "artist" varchar not null,
                "title" varchar not null,
                "album" varchar,
                "release_date" date not null,
                "person_id" uuid not null references "user"("id"),
                "created_at" timestamptz not null default now()
            );
            create index "idx_song_record_person_id" on "song_record" ("person_id");"#,
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(r#"drop table "song_record";"#).await?;
        Ok(())
    }
}
