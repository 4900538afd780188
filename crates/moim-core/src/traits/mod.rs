//! Domain traits - ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    AnswerRepository, CategoryRepository, ChatMessageRepository, GatheringQuery,
    GatheringRepository, MemberCounts, MemberRepository, MessageQuery, QuestionQuery,
    QuestionRepository, QuestionSort, RepoResult, UserRepository,
};
