mod matching_props;
mod request_props;
