mod common;
mod leaderboard;
