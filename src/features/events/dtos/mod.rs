mod event_dto;

pub use event_dto::{
    join_url, AccessEventDto, CreateEventDto, DeleteEventResponseDto, EventResponseDto,
};
