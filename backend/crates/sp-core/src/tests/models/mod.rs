mod presence_snapshot;
mod role;
