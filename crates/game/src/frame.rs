use bevy::prelude::*;
use utils::frame::FrameCount;

pub fn increase_frame_system(mut frame_count: ResMut<FrameCount>) {
    frame_count.advance();
}
