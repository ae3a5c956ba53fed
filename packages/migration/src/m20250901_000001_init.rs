use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    TimeMinutes,
    PriceCents,
    Description,
    Link,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(Iden)]
enum RecipeTags {
    Table,
    RecipeId,
    TagId,
}

#[derive(Iden)]
enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // recipes
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(id_col(Recipes::Id))
                    .col(ColumnDef::new(Recipes::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Recipes::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Recipes::TimeMinutes).integer().not_null())
                    .col(ColumnDef::new(Recipes::PriceCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Recipes::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Recipes::Link)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(timestamp_col(Recipes::CreatedAt))
                    .col(timestamp_col(Recipes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user_id")
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_user_id")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .to_owned(),
            )
            .await?;

        // tags
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(id_col(Tags::Id))
                    .col(ColumnDef::new(Tags::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Tags::Name).string_len(255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_user_id")
                            .from(Tags::Table, Tags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (user_id, name) uniqueness backs the get-or-create race handling
        manager
            .create_index(
                Index::create()
                    .name("ux_tags_user_id_name")
                    .table(Tags::Table)
                    .col(Tags::UserId)
                    .col(Tags::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ingredients
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(id_col(Ingredients::Id))
                    .col(ColumnDef::new(Ingredients::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Ingredients::Name).string_len(255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredients_user_id")
                            .from(Ingredients::Table, Ingredients::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_ingredients_user_id_name")
                    .table(Ingredients::Table)
                    .col(Ingredients::UserId)
                    .col(Ingredients::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // recipe_tags
        manager
            .create_table(
                Table::create()
                    .table(RecipeTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeTags::RecipeId).big_integer().not_null())
                    .col(ColumnDef::new(RecipeTags::TagId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(RecipeTags::RecipeId)
                            .col(RecipeTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_tags_recipe_id")
                            .from(RecipeTags::Table, RecipeTags::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_tags_tag_id")
                            .from(RecipeTags::Table, RecipeTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // recipe_ingredients
        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeIngredients::RecipeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::IngredientId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RecipeIngredients::RecipeId)
                            .col(RecipeIngredients::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ingredients_recipe_id")
                            .from(RecipeIngredients::Table, RecipeIngredients::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ingredients_ingredient_id")
                            .from(RecipeIngredients::Table, RecipeIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Join tables first, then labels and recipes, then users
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeTags::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_ingredients_user_id_name")
                    .table(Ingredients::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_tags_user_id_name")
                    .table(Tags::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipes_user_id")
                    .table(Recipes::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
