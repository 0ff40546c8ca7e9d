pub mod rendercv;
