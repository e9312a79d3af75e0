mod activity_recorder;
