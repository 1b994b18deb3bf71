//! Call records and the media quality data attached to them.

use chrono::{DateTime, FixedOffset};
use graphbind_core::{
    DISCRIMINATOR_PROPERTY, DecodeResult, FieldDef, ParseNode, Record, ScalarKind, Schema, WireEnum,
};

use crate::entity::{ENTITY, EntityLike};
use crate::odata_type;

graphbind_core::wire_enum! {
    pub enum AudioCodec: AUDIO_CODEC = single("audioCodec") {
        Unknown => "unknown",
        Invalid => "invalid",
        Cn => "cn",
        Pcma => "pcma",
        Pcmu => "pcmu",
        AmrWide => "amrWide",
        G722 => "g722",
        G7221 => "g7221",
        G7221c => "g7221c",
        G729 => "g729",
        MultiChannelAudio => "multiChannelAudio",
        Muchv2 => "muchv2",
        Opus => "opus",
        Satin => "satin",
        SatinFullband => "satinFullband",
        RtAudio8 => "rtAudio8",
        RtAudio16 => "rtAudio16",
        Silk => "silk",
        SilkNarrow => "silkNarrow",
        SilkWide => "silkWide",
        Siren => "siren",
        XmsRta => "xmsRta",
        UnknownFutureValue => "unknownFutureValue",
    }
    sentinel = "unknownFutureValue";
}

graphbind_core::wire_enum! {
    /// No sentinel: an unrecognized direction leaves the property unset.
    pub enum MediaStreamDirection: MEDIA_STREAM_DIRECTION = single("mediaStreamDirection") {
        CallerToCallee => "callerToCallee",
        CalleeToCaller => "calleeToCaller",
    }
}

graphbind_core::wire_enum! {
    pub enum Modality: MODALITY = single("modality") {
        Audio => "audio",
        Video => "video",
        VideoBasedScreenSharing => "videoBasedScreenSharing",
        Data => "data",
        ScreenSharing => "screenSharing",
        UnknownFutureValue => "unknownFutureValue",
    }
    sentinel = "unknownFutureValue";
}

graphbind_core::wire_enum! {
    pub enum CallType: CALL_TYPE = single("callType") {
        Unknown => "unknown",
        GroupCall => "groupCall",
        PeerToPeer => "peerToPeer",
        UnknownFutureValue => "unknownFutureValue",
    }
    sentinel = "unknownFutureValue";
}

pub static DEVICE_INFO: Schema = Schema {
    name: "microsoft.graph.callRecords.deviceInfo",
    discriminator: Some(odata_type::DEVICE_INFO),
    base: None,
    fields: &[
        FieldDef::string("captureDeviceName"),
        FieldDef::scalar("howlingEventCount", ScalarKind::Int32),
        FieldDef::scalar("micGlitchRate", ScalarKind::Float32),
        FieldDef::string(DISCRIMINATOR_PROPERTY),
        FieldDef::string("renderDeviceName"),
        FieldDef::scalar("sentSignalLevel", ScalarKind::Int32),
    ],
};

pub static MEDIA_STREAM: Schema = Schema {
    name: "microsoft.graph.callRecords.mediaStream",
    discriminator: Some(odata_type::MEDIA_STREAM),
    base: None,
    fields: &[
        FieldDef::enumeration("audioCodec", &AUDIO_CODEC),
        FieldDef::scalar("averageAudioDegradation", ScalarKind::Float32),
        FieldDef::scalar("averageBandwidthEstimate", ScalarKind::Int64),
        FieldDef::scalar("endDateTime", ScalarKind::DateTime),
        FieldDef::scalar("isAudioForwardErrorCorrectionUsed", ScalarKind::Bool),
        FieldDef::string(DISCRIMINATOR_PROPERTY),
        FieldDef::scalar("packetUtilization", ScalarKind::Int64),
        FieldDef::scalar("startDateTime", ScalarKind::DateTime),
        FieldDef::enumeration("streamDirection", &MEDIA_STREAM_DIRECTION),
        FieldDef::string("streamId"),
        FieldDef::scalar("wasMediaBypassed", ScalarKind::Bool),
    ],
};

pub static MEDIA: Schema = Schema {
    name: "microsoft.graph.callRecords.media",
    discriminator: Some(odata_type::MEDIA),
    base: None,
    fields: &[
        FieldDef::object("calleeDevice", create_device_info),
        FieldDef::object("callerDevice", create_device_info),
        FieldDef::string("label"),
        FieldDef::string(DISCRIMINATOR_PROPERTY),
        FieldDef::objects("streams", create_media_stream),
    ],
};

pub static CALL_RECORD: Schema = Schema {
    name: "microsoft.graph.callRecords.callRecord",
    discriminator: Some(odata_type::CALL_RECORD),
    base: Some(&ENTITY),
    fields: &[
        FieldDef::scalar("endDateTime", ScalarKind::DateTime),
        FieldDef::string("joinWebUrl"),
        FieldDef::scalar("lastModifiedDateTime", ScalarKind::DateTime),
        FieldDef::objects("media", create_media),
        FieldDef::enums("modalities", &MODALITY),
        FieldDef::scalar("startDateTime", ScalarKind::DateTime),
        FieldDef::enumeration("type", &CALL_TYPE),
        FieldDef::scalar("version", ScalarKind::Int64),
    ],
};

pub fn new_device_info() -> Record {
    Record::new(&DEVICE_INFO)
}

pub fn new_media_stream() -> Record {
    Record::new(&MEDIA_STREAM)
}

pub fn new_media() -> Record {
    Record::new(&MEDIA)
}

pub fn new_call_record() -> Record {
    Record::new(&CALL_RECORD)
}

pub fn create_device_info(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(new_device_info())
}

pub fn create_media_stream(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(new_media_stream())
}

pub fn create_media(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(new_media())
}

pub fn create_call_record(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(new_call_record())
}

record_model!(DeviceInfo => DEVICE_INFO);
record_model!(MediaStream => MEDIA_STREAM);
record_model!(Media => MEDIA);
record_model!(CallRecord => CALL_RECORD);

impl EntityLike for CallRecord {}

impl DeviceInfo {
    pub fn capture_device_name(&self) -> Option<&str> {
        self.0.string("captureDeviceName")
    }

    pub fn render_device_name(&self) -> Option<&str> {
        self.0.string("renderDeviceName")
    }

    pub fn howling_event_count(&self) -> Option<i32> {
        self.0.i32("howlingEventCount")
    }

    pub fn mic_glitch_rate(&self) -> Option<f64> {
        self.0.f64("micGlitchRate")
    }

    pub fn sent_signal_level(&self) -> Option<i32> {
        self.0.i32("sentSignalLevel")
    }
}

impl MediaStream {
    pub fn audio_codec(&self) -> Option<AudioCodec> {
        self.0.enumeration("audioCodec")
    }

    pub fn set_audio_codec(&mut self, codec: AudioCodec) {
        self.0.put("audioCodec", codec.to_enum_value());
    }

    pub fn average_audio_degradation(&self) -> Option<f64> {
        self.0.f64("averageAudioDegradation")
    }

    pub fn average_bandwidth_estimate(&self) -> Option<i64> {
        self.0.i64("averageBandwidthEstimate")
    }

    pub fn is_audio_forward_error_correction_used(&self) -> Option<bool> {
        self.0.bool("isAudioForwardErrorCorrectionUsed")
    }

    pub fn packet_utilization(&self) -> Option<i64> {
        self.0.i64("packetUtilization")
    }

    pub fn start_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.0.date_time("startDateTime")
    }

    pub fn end_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.0.date_time("endDateTime")
    }

    pub fn stream_direction(&self) -> Option<MediaStreamDirection> {
        self.0.enumeration("streamDirection")
    }

    pub fn set_stream_direction(&mut self, direction: MediaStreamDirection) {
        self.0.put("streamDirection", direction.to_enum_value());
    }

    pub fn stream_id(&self) -> Option<&str> {
        self.0.string("streamId")
    }

    pub fn set_stream_id(&mut self, stream_id: &str) {
        self.0.put("streamId", stream_id);
    }

    pub fn was_media_bypassed(&self) -> Option<bool> {
        self.0.bool("wasMediaBypassed")
    }
}

impl Media {
    pub fn label(&self) -> Option<&str> {
        self.0.string("label")
    }

    pub fn caller_device(&self) -> Option<DeviceInfo> {
        self.0.object("callerDevice")
    }

    pub fn callee_device(&self) -> Option<DeviceInfo> {
        self.0.object("calleeDevice")
    }

    pub fn streams(&self) -> Option<Vec<MediaStream>> {
        self.0.objects("streams")
    }
}

impl CallRecord {
    pub fn call_type(&self) -> Option<CallType> {
        self.0.enumeration("type")
    }

    pub fn modalities(&self) -> Option<Vec<Modality>> {
        self.0.enumerations("modalities")
    }

    pub fn set_modalities(&mut self, modalities: &[Modality]) {
        let values: Vec<_> = modalities.iter().map(|m| m.to_enum_value()).collect();
        self.0.put("modalities", values);
    }

    pub fn join_web_url(&self) -> Option<&str> {
        self.0.string("joinWebUrl")
    }

    pub fn version(&self) -> Option<i64> {
        self.0.i64("version")
    }

    pub fn start_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.0.date_time("startDateTime")
    }

    pub fn end_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.0.date_time("endDateTime")
    }

    pub fn media(&self) -> Option<Vec<Media>> {
        self.0.objects("media")
    }
}
