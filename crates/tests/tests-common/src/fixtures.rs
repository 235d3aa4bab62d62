//! The schema shared by the test suites: a small anime catalogue next to a space
//! mission directory.
//!
//! ```graphql
//! type Query {
//!   Page(page: Int, perPage: Int): PageResult
//!   Media(id: Int, id_not: Int, id_in: [Int], type: MediaType, search: String,
//!         averageScore_greater: Int, isAdult: Boolean, format_in: [MediaFormat]): Media
//!   node(id: ID!): Node
//!   missions(limit: Int, find: MissionsFind): [Mission]
//!   mission(id: ID!): Mission
//!   rankings(first: String): [Ranking]
//! }
//! type PageResult { pageInfo: PageInfo, media: [Media] }
//! type PageInfo { total: Int, currentPage: Int, hasNextPage: Boolean }
//! type Media {
//!   id: Int!, title: MediaTitle, type: MediaType, averageScore: Int, meanScore: Float,
//!   genres: [String], synonymGroups: [[String]], characters: [Character], staff: [Staff],
//!   score(format: ScoreFormat!): Int
//! }
//! type MediaTitle { english: String, romaji: String, native: String }
//! type Character { id: Int, name: CharacterName }
//! type CharacterName { full: String }
//! type Staff { id: Int, name: String }
//! interface Node { id: ID! }
//! type Mission implements Node { id: ID!, name: String, manufacturers: [String], website: String }
//! type Ranking { rank: Int, context: String }
//! enum MediaType { ANIME MANGA }
//! enum MediaFormat { TV MOVIE }
//! enum ScoreFormat { POINT_100 POINT_10 }
//! input MissionsFind
//! ```

use query_engine_metadata::metadata::SchemaModel;
use serde_json::Value;

use super::introspection::*;

pub fn media_schema_response() -> Value {
    let mut types = vec![
        object(
            "Query",
            vec![
                field_with_arguments(
                    "Page",
                    object_ref("PageResult"),
                    vec![
                        argument("page", scalar_ref("Int")),
                        argument("perPage", scalar_ref("Int")),
                    ],
                ),
                field_with_arguments(
                    "Media",
                    object_ref("Media"),
                    vec![
                        argument("id", scalar_ref("Int")),
                        argument("id_not", scalar_ref("Int")),
                        argument("id_in", list(scalar_ref("Int"))),
                        argument("type", enum_ref("MediaType")),
                        argument("search", scalar_ref("String")),
                        argument("averageScore_greater", scalar_ref("Int")),
                        argument("isAdult", scalar_ref("Boolean")),
                        argument("format_in", list(enum_ref("MediaFormat"))),
                    ],
                ),
                field_with_arguments(
                    "node",
                    named("INTERFACE", "Node"),
                    vec![argument("id", non_null(scalar_ref("ID")))],
                ),
                field_with_arguments(
                    "missions",
                    list(object_ref("Mission")),
                    vec![
                        argument("limit", scalar_ref("Int")),
                        argument("find", named("INPUT_OBJECT", "MissionsFind")),
                    ],
                ),
                field_with_arguments(
                    "mission",
                    object_ref("Mission"),
                    vec![argument("id", non_null(scalar_ref("ID")))],
                ),
                field_with_arguments(
                    "rankings",
                    list(object_ref("Ranking")),
                    vec![argument("first", scalar_ref("String"))],
                ),
            ],
        ),
        object(
            "PageResult",
            vec![
                field("pageInfo", object_ref("PageInfo")),
                field("media", list(object_ref("Media"))),
            ],
        ),
        object(
            "PageInfo",
            vec![
                field("total", scalar_ref("Int")),
                field("currentPage", scalar_ref("Int")),
                field("hasNextPage", scalar_ref("Boolean")),
            ],
        ),
        object(
            "Media",
            vec![
                field("id", non_null(scalar_ref("Int"))),
                field("title", object_ref("MediaTitle")),
                field("type", enum_ref("MediaType")),
                field("averageScore", scalar_ref("Int")),
                field("meanScore", scalar_ref("Float")),
                field("genres", list(scalar_ref("String"))),
                field("synonymGroups", list(list(scalar_ref("String")))),
                field("characters", list(object_ref("Character"))),
                field("staff", list(object_ref("Staff"))),
                field_with_arguments(
                    "score",
                    scalar_ref("Int"),
                    vec![argument("format", non_null(enum_ref("ScoreFormat")))],
                ),
            ],
        ),
        object(
            "MediaTitle",
            vec![
                field("english", scalar_ref("String")),
                field("romaji", scalar_ref("String")),
                field("native", scalar_ref("String")),
            ],
        ),
        object(
            "Character",
            vec![
                field("id", scalar_ref("Int")),
                field("name", object_ref("CharacterName")),
            ],
        ),
        object("CharacterName", vec![field("full", scalar_ref("String"))]),
        object(
            "Staff",
            vec![
                field("id", scalar_ref("Int")),
                field("name", scalar_ref("String")),
            ],
        ),
        interface(
            "Node",
            vec![field("id", non_null(scalar_ref("ID")))],
            &["Mission"],
        ),
        object(
            "Mission",
            vec![
                field("id", non_null(scalar_ref("ID"))),
                field("name", scalar_ref("String")),
                field("manufacturers", list(scalar_ref("String"))),
                field("website", scalar_ref("String")),
            ],
        ),
        object(
            "Ranking",
            vec![
                field("rank", scalar_ref("Int")),
                field("context", scalar_ref("String")),
            ],
        ),
        enumeration("MediaType", &["ANIME", "MANGA"]),
        enumeration("MediaFormat", &["TV", "MOVIE"]),
        enumeration("ScoreFormat", &["POINT_100", "POINT_10"]),
        input_object("MissionsFind"),
    ];
    types.extend(builtin_scalars());
    response("Query", types)
}

/// [`media_schema_response`] as a model.
pub fn media_schema() -> SchemaModel {
    SchemaModel::from_introspection_response(&media_schema_response())
        .expect("the fixture schema is valid")
}
