pub mod day_list;
pub mod listen_view;
pub mod memo_view;
pub mod personal_list;
pub mod study_view;
pub mod word_detail;
pub mod word_form;
pub mod word_list;

pub use day_list::DayListView;
pub use listen_view::ListenView;
pub use memo_view::MemoView;
pub use personal_list::PersonalListView;
pub use study_view::StudyView;
pub use word_detail::WordDetailView;
pub use word_form::WordFormView;
pub use word_list::WordListView;
