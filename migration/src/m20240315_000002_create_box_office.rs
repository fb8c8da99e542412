use sea_orm_migration::{prelude::*, schema::*};

const AGE_RATINGS: [&str; 5] = ["0+", "6+", "12+", "16+", "18+"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(integer(Movies::Duration))
                    .col(
                        string(Movies::AgeRating)
                            .check(Expr::col(Movies::AgeRating).is_in(AGE_RATINGS)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Screenings::Table)
                    .if_not_exists()
                    .col(pk_auto(Screenings::Id))
                    .col(integer(Screenings::MovieId))
                    .col(string(Screenings::ScreenTime))
                    .col(integer(Screenings::HallNumber))
                    .col(double(Screenings::Price))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screenings_movie_id")
                            .from(Screenings::Table, Screenings::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(pk_auto(Tickets::Id))
                    .col(integer(Tickets::ScreeningId))
                    .col(integer(Tickets::SeatNumber))
                    .col(string(Tickets::PurchaseTime))
                    .col(string(Tickets::CustomerName))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_screening_id")
                            .from(Tickets::Table, Tickets::ScreeningId)
                            .to(Screenings::Table, Screenings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_screening_seat")
                    .table(Tickets::Table)
                    .col(Tickets::ScreeningId)
                    .col(Tickets::SeatNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string(Customers::Name))
                    .col(string_uniq(Customers::Email))
                    .col(string_null(Customers::Phone))
                    .col(integer(Customers::LoyaltyPoints).default(0))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Tickets::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Screenings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Duration,
    AgeRating,
}

#[derive(DeriveIden)]
enum Screenings {
    Table,
    Id,
    MovieId,
    ScreenTime,
    HallNumber,
    Price,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    ScreeningId,
    SeatNumber,
    PurchaseTime,
    CustomerName,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    LoyaltyPoints,
}
