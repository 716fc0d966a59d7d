mod invites;
mod relations;
mod sessions;
mod users;
mod workouts;
