mod app;
mod form;
mod list;
mod presentation;
