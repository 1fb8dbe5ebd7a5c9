use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    DisplayName,
    Role,
    Balance,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
    Status,
    StartedAt,
    EndedAt,
    WinningNumbers,
    Revenue,
    PrizePool,
    CarriedRollover,
    RolloverAmount,
    Version,
}

#[derive(Iden)]
enum Boards {
    Table,
    Id,
    PlayerId,
    RoundId,
    Numbers,
    FieldCount,
    Cost,
    Autoplay,
    RemainingWeeks,
    IsWinning,
    SourceBoardId,
    CreatedAt,
}

#[derive(Iden)]
enum Winners {
    Table,
    Id,
    RoundId,
    PlayerId,
    BoardId,
    Payout,
    CreatedAt,
}

/// At most one open round; both Postgres and SQLite support partial indexes.
const SINGLE_OPEN_ROUND_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS ux_rounds_single_open ON rounds (status) WHERE status = 'OPEN'";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // accounts
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Role)
                            .string_len(16)
                            .not_null()
                            .default("PLAYER"),
                    )
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Accounts::Balance).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // rounds
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rounds::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Rounds::Status)
                            .string_len(16)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(
                        ColumnDef::new(Rounds::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rounds::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Rounds::WinningNumbers).json_binary().null())
                    .col(
                        ColumnDef::new(Rounds::Revenue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rounds::PrizePool)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rounds::CarriedRollover)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Rounds::RolloverAmount).big_integer().null())
                    .col(
                        ColumnDef::new(Rounds::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_rounds_ended_at")
                    .table(Rounds::Table)
                    .col(Rounds::EndedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(SINGLE_OPEN_ROUND_INDEX)
            .await?;

        // boards
        manager
            .create_table(
                Table::create()
                    .table(Boards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Boards::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Boards::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Boards::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Boards::Numbers).json_binary().not_null())
                    .col(
                        ColumnDef::new(Boards::FieldCount)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Boards::FieldCount).between(5, 8)),
                    )
                    .col(ColumnDef::new(Boards::Cost).big_integer().not_null())
                    .col(
                        ColumnDef::new(Boards::Autoplay)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Boards::RemainingWeeks)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Boards::RemainingWeeks).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Boards::IsWinning)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Boards::SourceBoardId).big_integer().null())
                    .col(
                        ColumnDef::new(Boards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boards_player_id")
                            .from(Boards::Table, Boards::PlayerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boards_round_id")
                            .from(Boards::Table, Boards::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_boards_round_id")
                    .table(Boards::Table)
                    .col(Boards::RoundId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_boards_player_id")
                    .table(Boards::Table)
                    .col(Boards::PlayerId)
                    .to_owned(),
            )
            .await?;

        // A board is continued into the next round at most once
        manager
            .create_index(
                Index::create()
                    .name("ux_boards_source_board_id")
                    .table(Boards::Table)
                    .col(Boards::SourceBoardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // winners
        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winners::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Winners::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::BoardId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::Payout).big_integer().not_null())
                    .col(
                        ColumnDef::new(Winners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_round_id")
                            .from(Winners::Table, Winners::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_player_id")
                            .from(Winners::Table, Winners::PlayerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_board_id")
                            .from(Winners::Table, Winners::BoardId)
                            .to(Boards::Table, Boards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One winner record per board
        manager
            .create_index(
                Index::create()
                    .name("ux_winners_board_id")
                    .table(Winners::Table)
                    .col(Winners::BoardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_winners_round_id")
                    .table(Winners::Table)
                    .col(Winners::RoundId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Winners::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Boards::Table).if_exists().to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS ux_rounds_single_open")
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
